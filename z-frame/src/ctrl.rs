//! Coupled control modes.
//!
//! Every mode proposes new angles for one tick, clamps them with the joint
//! limits, and reports whether anything moved.
use crate::{Angles, Joint, Limits};
use std::ops::RangeInclusive;

/// Step of the actuator buttons in degrees.
pub const STEP: f64 = 0.4;
/// Step of the ratio buttons in degrees.
pub const RATIO_STEP: f64 = 0.5;
/// A held button steps once every this many ticks.
pub const STEP_FRAMES: u32 = 3;
/// Valid range of the angle2/angle1 ratio.
pub const RATIO_RANGE: RangeInclusive<f64> = 0.1..=2.;
/// Default angle2/angle1 ratio.
pub const DEFAULT_RATIO: f64 = 0.8;
/// Joystick deflection below this magnitude is ignored.
pub const DEAD_ZONE: f64 = 0.1;
/// Joystick speed at full deflection in degrees per tick.
pub const JOYSTICK_SPEED: f64 = 0.1;
/// Blend weights at or below this value are dropped.
pub const BLEND_CUTOFF: f64 = 0.1;
// Tolerance of the all-or-nothing comparison
const SHORT_TOL: f64 = 1e-9;

/// Step direction.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "lowercase")
)]
pub enum Dir {
    /// Increase the angle
    #[default]
    Up,
    /// Decrease the angle
    Down,
}

impl Dir {
    /// Sign of the direction.
    pub const fn sign(&self) -> f64 {
        match self {
            Self::Up => 1.,
            Self::Down => -1.,
        }
    }
}

/// Actuator groups of the control panel.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "lowercase")
)]
pub enum Actuator {
    /// Drive angle1 only
    Act1,
    /// Drive angle2 only
    Act2,
    /// Drive angle3 only
    Act3,
    /// Drive angle1, then angle2 reversed at angle1's limit
    Z1,
    /// Drive angle2, then angle1 reversed at angle2's limit
    Z2,
    /// Move angle1 and angle2 together, keeping their difference
    Elevate,
    /// Move angle1 and angle2 oppositely, keeping their sum
    Tilt,
    /// Move angle2 against angle1 by the configured ratio
    Ratio,
}

impl Actuator {
    /// All actuators in panel order.
    pub const ALL: [Self; 8] = [
        Self::Act1,
        Self::Act2,
        Self::Act3,
        Self::Z1,
        Self::Z2,
        Self::Elevate,
        Self::Tilt,
        Self::Ratio,
    ];

    /// Name of the actuator group.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Act1 => "Act-1",
            Self::Act2 => "Act-2",
            Self::Act3 => "Act-3",
            Self::Z1 => "Act-1-then-2",
            Self::Z2 => "Act-2-then-1",
            Self::Elevate => "Z-Diff-Const",
            Self::Tilt => "Z-Sum-Const",
            Self::Ratio => "Maintain Ratio",
        }
    }
}

/// A discrete control button, an actuator with a direction.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Button {
    /// Actuator group
    pub act: Actuator,
    /// Step direction
    pub dir: Dir,
}

impl Button {
    /// Create an increasing button.
    pub const fn up(act: Actuator) -> Self {
        Self { act, dir: Dir::Up }
    }

    /// Create a decreasing button.
    pub const fn down(act: Actuator) -> Self {
        Self { act, dir: Dir::Down }
    }

    /// Stable label of the button, recorded in samples.
    pub const fn label(&self) -> &'static str {
        macro_rules! labels {
            ($($act:ident => $up:literal, $down:literal),+ $(,)?) => {
                match (self.act, self.dir) {
                    $(
                        (Actuator::$act, Dir::Up) => $up,
                        (Actuator::$act, Dir::Down) => $down,
                    )+
                }
            };
        }
        labels! {
            Act1 => "act1-up", "act1-down",
            Act2 => "act2-up", "act2-down",
            Act3 => "act3-up", "act3-down",
            Z1 => "z1-up", "z1-down",
            Z2 => "z2-up", "z2-down",
            Elevate => "elevate-up", "elevate-down",
            Tilt => "tilt-up", "tilt-down",
            Ratio => "ratio-up", "ratio-down",
        }
    }
}

/// Joystick deflection in the unit disk, Y pointing up.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Deflection {
    /// Horizontal deflection, positive to the right
    pub x: f64,
    /// Vertical deflection, positive upward
    pub y: f64,
}

impl Deflection {
    /// Create a deflection, scaled back into the unit disk if needed.
    pub fn new(x: f64, y: f64) -> Self {
        let m = x.hypot(y);
        if !m.is_finite() {
            Self::default()
        } else if m > 1. {
            Self { x: x / m, y: y / m }
        } else {
            Self { x, y }
        }
    }

    /// Create from a knob offset in screen space (Y down) and the joystick
    /// radius.
    pub fn from_knob(dx: f64, dy: f64, radius: f64) -> Self {
        if radius > 0. {
            Self::new(dx / radius, -dy / radius)
        } else {
            Self::default()
        }
    }

    /// Magnitude of the deflection.
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Decompose into `[d1, d2]` angle deltas of a tick.
    ///
    /// Vertical deflection moves both angles together (elevate), horizontal
    /// deflection moves them oppositely (tilt). In between, the two are
    /// feathered by `sin²` and `cos²` of the stick angle. Return `None`
    /// inside the dead zone.
    pub fn delta(&self) -> Option<[f64; 2]> {
        let m = self.magnitude().min(1.);
        if m < DEAD_ZONE {
            return None;
        }
        // One feathering over the whole circle, no sector is pure tilt
        let (s, c) = self.y.atan2(self.x).sin_cos();
        let elevate = s * s;
        let tilt = 1. - elevate;
        let speed = JOYSTICK_SPEED * m;
        let de = if elevate > BLEND_CUTOFF { speed * elevate * s } else { 0. };
        let dt = if tilt > BLEND_CUTOFF { speed * tilt * c } else { 0. };
        Some([de + dt, de - dt])
    }
}

/// Shared parameters of the control modes.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rules {
    /// Joint limits
    pub limits: Limits,
    /// Ratio of the angle2 step to the angle1 step
    pub ratio: f64,
    /// Let a coupled step continue on one joint when the other hits its limit
    pub allow_partial: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self { limits: Limits::default(), ratio: DEFAULT_RATIO, allow_partial: true }
    }
}

impl Rules {
    /// Set the ratio, clamped into [`RATIO_RANGE`].
    ///
    /// A NaN ratio is ignored.
    pub fn set_ratio(&mut self, ratio: f64) {
        if !ratio.is_nan() {
            self.ratio = ratio.clamp(*RATIO_RANGE.start(), *RATIO_RANGE.end());
        }
    }
}

/// Control modes of a single tick.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub enum Control {
    /// Nothing to do
    #[default]
    Idle,
    /// Step one joint
    Single(Joint, Dir),
    /// Step angle1 and angle2 by the same delta (Z-Elevate)
    Sum(Dir),
    /// Step angle1 and angle2 by opposite deltas (Z-Tilt)
    Diff(Dir),
    /// Step the primary joint, or its partner reversed when the primary is at
    /// its limit in the direction of motion (Z-1/Z-2)
    Swap(Joint, Dir),
    /// Step angle1 and move angle2 against it by the ratio
    Ratio(Dir),
    /// Blend of [`Control::Sum`] and [`Control::Diff`] from a joystick
    Joystick(Deflection),
}

impl From<Button> for Control {
    fn from(Button { act, dir }: Button) -> Self {
        match act {
            Actuator::Act1 => Self::Single(Joint::Middle, dir),
            Actuator::Act2 => Self::Single(Joint::SeatPan, dir),
            Actuator::Act3 => Self::Single(Joint::Backrest, dir),
            Actuator::Z1 => Self::Swap(Joint::Middle, dir),
            Actuator::Z2 => Self::Swap(Joint::SeatPan, dir),
            Actuator::Elevate => Self::Sum(dir),
            Actuator::Tilt => Self::Diff(dir),
            Actuator::Ratio => Self::Ratio(dir),
        }
    }
}

impl Control {
    /// Apply one step of the mode. Return true if any angle changed.
    pub fn step(&self, angles: &mut Angles, rules: &Rules) -> bool {
        let limits = &rules.limits;
        match *self {
            Self::Idle => false,
            Self::Single(joint, dir) => step_single(angles, limits, joint, dir.sign() * STEP),
            Self::Sum(dir) => {
                let d = dir.sign() * STEP;
                step_pair(angles, rules, [d, d])
            }
            Self::Diff(dir) => {
                let d = dir.sign() * STEP;
                step_pair(angles, rules, [d, -d])
            }
            Self::Swap(primary, dir) => step_swap(angles, limits, primary, dir.sign() * STEP),
            Self::Ratio(dir) => step_ratio(angles, limits, rules.ratio, dir.sign() * RATIO_STEP),
            Self::Joystick(def) => match def.delta() {
                Some(d) => step_pair(angles, rules, d),
                None => false,
            },
        }
    }
}

/// Step a single joint.
pub fn step_single(angles: &mut Angles, limits: &Limits, joint: Joint, delta: f64) -> bool {
    let next = limits.clamp(joint, angles[joint] + delta);
    if next == angles[joint] {
        return false;
    }
    angles[joint] = next;
    true
}

/// Step the primary joint, swapping to its partner with the reversed delta
/// when the primary is at its limit toward `delta`.
pub fn step_swap(angles: &mut Angles, limits: &Limits, primary: Joint, delta: f64) -> bool {
    if limits[primary].at_limit_toward(angles[primary], delta) {
        step_single(angles, limits, primary.partner(), -delta)
    } else {
        step_single(angles, limits, primary, delta)
    }
}

/// Step angle1 and angle2 together with the coupled policy of the rules.
///
/// With `allow_partial`, each joint stops at its own limit. Without it, the
/// step is dropped when either joint would fall short of its delta.
pub fn step_pair(angles: &mut Angles, rules: &Rules, delta: [f64; 2]) -> bool {
    let pair = [Joint::Middle, Joint::SeatPan];
    let next = [0, 1].map(|i| rules.limits.clamp(pair[i], angles[pair[i]] + delta[i]));
    if !rules.allow_partial {
        let short = |i: usize| (next[i] - angles[pair[i]]).abs() < delta[i].abs() - SHORT_TOL;
        if short(0) || short(1) {
            return false;
        }
    }
    let mut changed = false;
    for (joint, next) in pair.into_iter().zip(next) {
        if next != angles[joint] {
            angles[joint] = next;
            changed = true;
        }
    }
    changed
}

/// Step angle1 by `delta` and angle2 by `-delta * ratio`, each clamped.
pub fn step_ratio(angles: &mut Angles, limits: &Limits, ratio: f64, delta: f64) -> bool {
    let moved1 = step_single(angles, limits, Joint::Middle, delta);
    let moved2 = step_single(angles, limits, Joint::SeatPan, -delta * ratio);
    moved1 || moved2
}

/// A held button with its tick counter.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hold {
    /// The held button
    pub button: Button,
    frames: u32,
}

impl Hold {
    /// Start holding a button.
    pub const fn new(button: Button) -> Self {
        Self { button, frames: 0 }
    }

    /// Count a tick. Return true on ticks that should step.
    pub fn advance(&mut self) -> bool {
        self.frames += 1;
        if self.frames >= STEP_FRAMES {
            self.frames = 0;
            true
        } else {
            false
        }
    }

    /// Count a tick and step the button's control if due.
    pub fn tick(&mut self, angles: &mut Angles, rules: &Rules) -> bool {
        self.advance() && Control::from(self.button).step(angles, rules)
    }
}
