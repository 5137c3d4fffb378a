use crate::{Angles, Joint};

/// Tolerance of the "at limit" test in degrees.
pub const LIMIT_TOL: f64 = 0.01;

/// Angle range of a joint in degrees.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Limit {
    /// Lower bound
    pub min: f64,
    /// Upper bound
    pub max: f64,
}

impl Default for Limit {
    fn default() -> Self {
        Self::FULL
    }
}

impl Limit {
    /// Unconstrained full turn `[0, 360]`.
    pub const FULL: Self = Self { min: 0., max: 360. };

    /// Create a checked limit.
    ///
    /// Non-finite bounds and `min > max` are rejected.
    pub fn new(joint: Joint, min: f64, max: f64) -> Result<Self, LimitError> {
        if min.is_finite() && max.is_finite() && min <= max {
            Ok(Self { min, max })
        } else {
            Err(LimitError { joint, min, max })
        }
    }

    /// Clamp the angle into the range.
    pub fn clamp(&self, angle: f64) -> f64 {
        self.min.max(self.max.min(angle))
    }

    /// Check if the angle sits on either bound.
    pub fn at_limit(&self, angle: f64) -> bool {
        (angle - self.min).abs() < LIMIT_TOL || (angle - self.max).abs() < LIMIT_TOL
    }

    /// Check if the angle sits on the bound that `delta` is moving toward.
    pub fn at_limit_toward(&self, angle: f64, delta: f64) -> bool {
        (angle - self.min).abs() < LIMIT_TOL && delta < 0.
            || (angle - self.max).abs() < LIMIT_TOL && delta > 0.
    }
}

/// Error for a rejected limit configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitError {
    /// The joint being configured
    pub joint: Joint,
    /// Requested lower bound
    pub min: f64,
    /// Requested upper bound
    pub max: f64,
}

impl std::fmt::Display for LimitError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let Self { joint, min, max } = self;
        write!(f, "invalid limit of {joint}: [{min}, {max}]")
    }
}

impl std::error::Error for LimitError {}

/// Angle limits of all joints.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Limits(pub [Limit; 3]);

impl std::ops::Index<Joint> for Limits {
    type Output = Limit;

    fn index(&self, joint: Joint) -> &Self::Output {
        &self.0[joint.index()]
    }
}

impl Limits {
    /// Factory limits of the wheelchair base.
    pub const fn wheelchair() -> Self {
        Self([
            Limit { min: 5., max: 40. },
            Limit { min: 5., max: 90. },
            Limit { min: 5., max: 100. },
        ])
    }

    /// Replace the limit of a joint.
    ///
    /// The previous limit is kept if the new one is invalid.
    pub fn set(&mut self, joint: Joint, min: f64, max: f64) -> Result<(), LimitError> {
        self.0[joint.index()] = Limit::new(joint, min, max)?;
        Ok(())
    }

    /// Clamp the angle of a joint.
    pub fn clamp(&self, joint: Joint, angle: f64) -> f64 {
        self[joint].clamp(angle)
    }

    /// Clamp all angles in-placed.
    pub fn clamp_all(&self, angles: &mut Angles) {
        for joint in Joint::ALL {
            angles[joint] = self.clamp(joint, angles[joint]);
        }
    }

    /// Limit flags of all joints, for highlighting.
    pub fn at_limit(&self, angles: &Angles) -> [bool; 3] {
        Joint::ALL.map(|joint| self[joint].at_limit(angles[joint]))
    }
}
