use crate::{ctrl::DEFAULT_RATIO, Angles, Joint, Limits, Rules};

/// A saved position.
///
/// Disabled axes are left alone when animating toward the preset.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Preset {
    /// Target angles
    pub angles: [f64; 3],
    /// Enabled axes
    pub enabled: [bool; 3],
}

impl Default for Preset {
    fn default() -> Self {
        Self::new(Angles::default().into())
    }
}

impl Preset {
    /// Create a preset with all axes enabled.
    pub const fn new(angles: [f64; 3]) -> Self {
        Self { angles, enabled: [true; 3] }
    }

    /// Seek targets of the preset.
    pub fn targets(&self) -> [Option<f64>; 3] {
        Joint::ALL.map(|j| self.enabled[j.index()].then_some(self.angles[j.index()]))
    }

    /// Save the angles into the preset, keeping the enabled axes.
    pub fn save(&mut self, angles: &Angles) {
        self.angles = (*angles).into();
    }
}

/// The six saved positions.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Presets(pub [Preset; 6]);

impl Default for Presets {
    fn default() -> Self {
        Self([
            Preset::new([15., 25., 50.]),
            Preset::new([35., 10., 50.]),
            Preset::new([10., 10., 50.]),
            Preset::new([15., 15., 50.]),
            Preset::new([20., 20., 50.]),
            Preset::new([25., 25., 50.]),
        ])
    }
}

impl Presets {
    /// Get a preset by its index from zero.
    pub fn get(&self, i: usize) -> Option<&Preset> {
        self.0.get(i)
    }

    /// Get a mutable preset by its index from zero.
    pub fn get_mut(&mut self, i: usize) -> Option<&mut Preset> {
        self.0.get_mut(i)
    }

    /// Number of presets.
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, there are six presets.
    pub const fn is_empty(&self) -> bool {
        false
    }
}

/// Visibility of the auxiliary views.
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct View {
    /// Phase chart of angle1 against angle2
    pub graph12: bool,
    /// Phase chart of angle1 against angle3
    pub graph13: bool,
    /// Phase chart of angle3 against angle2
    pub graph32: bool,
    /// Draw the chair outline over the links
    pub draw_chair: bool,
    /// Time chart of the history
    pub oscilloscope: bool,
    /// Trails of the seat-pan direction
    pub seat_pan_trails: bool,
}

impl Default for View {
    fn default() -> Self {
        Self {
            graph12: true,
            graph13: false,
            graph32: false,
            draw_chair: false,
            oscilloscope: false,
            seat_pan_trails: false,
        }
    }
}

/// The persisted settings.
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Settings {
    /// Joint limits
    pub limits: Limits,
    /// Saved positions
    pub presets: Presets,
    /// Ratio of the angle2 step to the angle1 step
    pub ratio: f64,
    /// Let a coupled step continue on one joint when the other hits its limit
    pub allow_partial: bool,
    /// View toggles
    pub view: View,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            presets: Presets::default(),
            ratio: DEFAULT_RATIO,
            allow_partial: true,
            view: View::default(),
        }
    }
}

impl Settings {
    /// Factory settings, with the wheelchair limits.
    pub fn reset() -> Self {
        Self { limits: Limits::wheelchair(), ..Self::default() }
    }

    /// Control rules of the settings.
    ///
    /// The ratio is clamped into its valid range.
    pub fn rules(&self) -> Rules {
        let mut rules = Rules {
            limits: self.limits,
            allow_partial: self.allow_partial,
            ..Rules::default()
        };
        rules.set_ratio(self.ratio);
        rules
    }
}
