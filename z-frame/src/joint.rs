/// Rotary joints of the Z-frame, from the base to the tip.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "lowercase")
)]
pub enum Joint {
    /// Middle link joint at the base pivot (`angle1`)
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "angle1"))]
    Middle = 0,
    /// Seat-pan joint at the middle end (`angle2`)
    #[cfg_attr(feature = "serde", serde(alias = "angle2"))]
    SeatPan = 1,
    /// Backrest joint at the seat end (`angle3`)
    #[cfg_attr(feature = "serde", serde(alias = "angle3"))]
    Backrest = 2,
}

impl std::fmt::Display for Joint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Joint {
    /// All joints in chain order.
    pub const ALL: [Self; 3] = [Self::Middle, Self::SeatPan, Self::Backrest];

    /// Index of the joint in the chain.
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Variable name used in formulas and samples.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Middle => "angle1",
            Self::SeatPan => "angle2",
            Self::Backrest => "angle3",
        }
    }

    /// The other joint of the middle/seat-pan pair.
    ///
    /// The backrest is not coupled, so it returns itself.
    pub const fn partner(&self) -> Self {
        match self {
            Self::Middle => Self::SeatPan,
            Self::SeatPan => Self::Middle,
            Self::Backrest => Self::Backrest,
        }
    }
}

/// Joint angle state in degrees.
///
/// The absolute direction of each link is composed down the chain:
///
/// + Middle: `a1 + 180`
/// + Seat pan: `a1 - a2`
/// + Backrest: `a1 - a2 - a3`
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Angles {
    /// Middle link angle from the horizontal baseline
    pub a1: f64,
    /// Seat-pan interior angle at the middle end
    pub a2: f64,
    /// Backrest interior angle at the seat end, clockwise
    pub a3: f64,
}

impl Default for Angles {
    fn default() -> Self {
        Self::new(30., 30., 30.)
    }
}

impl From<[f64; 3]> for Angles {
    fn from([a1, a2, a3]: [f64; 3]) -> Self {
        Self { a1, a2, a3 }
    }
}

impl From<Angles> for [f64; 3] {
    fn from(a: Angles) -> Self {
        [a.a1, a.a2, a.a3]
    }
}

impl std::ops::Index<Joint> for Angles {
    type Output = f64;

    fn index(&self, joint: Joint) -> &Self::Output {
        match joint {
            Joint::Middle => &self.a1,
            Joint::SeatPan => &self.a2,
            Joint::Backrest => &self.a3,
        }
    }
}

impl std::ops::IndexMut<Joint> for Angles {
    fn index_mut(&mut self, joint: Joint) -> &mut Self::Output {
        match joint {
            Joint::Middle => &mut self.a1,
            Joint::SeatPan => &mut self.a2,
            Joint::Backrest => &mut self.a3,
        }
    }
}

impl Angles {
    /// Create a new state.
    pub const fn new(a1: f64, a2: f64, a3: f64) -> Self {
        Self { a1, a2, a3 }
    }

    /// Absolute direction of the middle link.
    pub fn middle_dir(&self) -> f64 {
        self.a1 + 180.
    }

    /// Absolute direction of the seat-pan link.
    pub fn seat_pan_dir(&self) -> f64 {
        self.a1 - self.a2
    }

    /// Absolute direction of the backrest link.
    pub fn backrest_dir(&self) -> f64 {
        self.a1 - self.a2 - self.a3
    }

    /// Seat-pan direction normalized into (-180, 180].
    pub fn seat_pan(&self) -> f64 {
        norm_half_turn(self.seat_pan_dir())
    }
}

/// Normalize an angle into (-180, 180] by whole turns.
pub fn norm_half_turn(mut deg: f64) -> f64 {
    if !deg.is_finite() {
        return deg;
    }
    deg %= 360.;
    if deg > 180. {
        deg -= 360.;
    } else if deg <= -180. {
        deg += 360.;
    }
    deg
}

/// Round to the nearest half degree, ties toward positive infinity.
pub fn round_half(deg: f64) -> f64 {
    (deg * 2. + 0.5).floor() / 2.
}
