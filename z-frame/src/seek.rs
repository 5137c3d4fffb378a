use crate::{Angles, Joint, Limits, Preset};

/// Seeking speed in degrees per tick.
pub const SEEK_SPEED: f64 = 0.08;
/// Snap to the target below this distance in degrees.
pub const ARRIVE_DIST: f64 = 0.1;

/// Animation toward target angles.
///
/// A `None` target leaves that axis alone.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Seek {
    /// Target of each joint
    pub targets: [Option<f64>; 3],
}

impl Seek {
    /// Create a seek, the targets are clamped into the limits.
    pub fn new(targets: [Option<f64>; 3], limits: &Limits) -> Self {
        let mut targets = targets;
        for (joint, t) in Joint::ALL.into_iter().zip(&mut targets) {
            *t = t.map(|t| limits.clamp(joint, t));
        }
        Self { targets }
    }

    /// Create a seek toward a preset.
    pub fn from_preset(preset: &Preset, limits: &Limits) -> Self {
        Self::new(preset.targets(), limits)
    }

    /// Check if there is nothing to seek.
    pub fn is_empty(&self) -> bool {
        self.targets.iter().all(Option::is_none)
    }

    /// Distance to the targets over the enabled axes.
    pub fn distance(&self, angles: &Angles) -> f64 {
        self.diff(angles).iter().map(|d| d * d).sum::<f64>().sqrt()
    }

    fn diff(&self, angles: &Angles) -> [f64; 3] {
        Joint::ALL.map(|joint| match self.targets[joint.index()] {
            Some(t) => t - angles[joint],
            None => 0.,
        })
    }

    /// Advance a tick toward the targets. Return true once arrived.
    ///
    /// On arrival the enabled axes snap exactly onto their targets.
    pub fn tick(&self, angles: &mut Angles, limits: &Limits) -> bool {
        let diff = self.diff(angles);
        let dist = diff.iter().map(|d| d * d).sum::<f64>().sqrt();
        if dist < ARRIVE_DIST {
            for (joint, t) in Joint::ALL.into_iter().zip(self.targets) {
                if let Some(t) = t {
                    angles[joint] = t;
                }
            }
            return true;
        }
        let step = SEEK_SPEED.min(dist) / dist;
        for (joint, (t, d)) in Joint::ALL.into_iter().zip(self.targets.into_iter().zip(diff)) {
            if t.is_some() {
                angles[joint] = limits.clamp(joint, angles[joint] + d * step);
            }
        }
        false
    }
}
