//! Simulator session.
//!
//! [`Sim`] owns the whole state. Inputs are applied with [`Sim::handle`] and
//! time advances with [`Sim::tick`].
use crate::*;

/// The active driver of the angles.
///
/// Only one driver is active at a time. Drivers are ranked by
/// [`Driver::precedence`].
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub enum Driver {
    /// No driver
    #[default]
    Idle,
    /// Dragging a link
    Drag(Joint),
    /// Holding an actuator button
    Button(Hold),
    /// Deflecting the joystick
    Joystick(Deflection),
    /// Animating toward targets
    Seek(Seek),
}

impl Driver {
    /// Rank of the driver, drag > button > joystick > seek > idle.
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Seek(_) => 1,
            Self::Joystick(_) => 2,
            Self::Button(_) => 3,
            Self::Drag(_) => 4,
        }
    }

    /// Name of the driver.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Drag(_) => "drag",
            Self::Button(_) => "button",
            Self::Joystick(_) => "joystick",
            Self::Seek(_) => "seek",
        }
    }

    /// Check if no driver is active.
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The dragged joint, if dragging.
    pub const fn dragging(&self) -> Option<Joint> {
        match self {
            Self::Drag(joint) => Some(*joint),
            _ => None,
        }
    }
}

/// User inputs of the session.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    /// Grab the link of a joint
    DragStart(Joint),
    /// Move the grabbed link toward the cursor
    DragTo([f64; 2]),
    /// Drop the grabbed link
    DragEnd,
    /// Press and hold a button
    Press(Button),
    /// Release the held button
    Release,
    /// Deflect the joystick, Y pointing up
    Joystick(f64, f64),
    /// Release the joystick
    JoystickRelease,
    /// Animate toward the targets, `None` leaves the axis alone
    Animate([Option<f64>; 3]),
    /// Animate toward a preset by its index from zero
    GoTo(usize),
    /// Save the current angles into a preset
    Save(usize),
    /// Set the limit of a joint
    Limit(Joint, f64, f64),
    /// Set the angle2/angle1 ratio
    Ratio(f64),
    /// Set the coupled policy
    AllowPartial(bool),
    /// Bind a joint to a formula, or unbind it with `None`
    Formula(Joint, Option<String>),
    /// Move the base pivot for a new view size
    Layout(f64, f64),
    /// Drop the recorded history
    ClearHistory,
    /// Restore the factory state
    Reset,
}

/// Error of handling an input.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Rejected limit
    Limit(LimitError),
    /// Invalid formula or failed evaluation
    Formula(FormulaError),
    /// Preset index out of range
    Preset(usize),
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Limit(e) => write!(f, "{e}"),
            Self::Formula(e) => write!(f, "formula error: {e}"),
            Self::Preset(i) => write!(f, "no preset at index {i}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Limit(e) => Some(e),
            Self::Formula(e) => Some(e),
            Self::Preset(_) => None,
        }
    }
}

impl From<LimitError> for SimError {
    fn from(e: LimitError) -> Self {
        Self::Limit(e)
    }
}

impl From<FormulaError> for SimError {
    fn from(e: FormulaError) -> Self {
        Self::Formula(e)
    }
}

/// The simulator session.
#[derive(Clone, Debug)]
pub struct Sim {
    angles: Angles,
    rules: Rules,
    geo: Geometry,
    presets: Presets,
    view: View,
    driver: Driver,
    rec: Recorder,
    binding: Option<Binding>,
    now: f64,
}

impl Default for Sim {
    fn default() -> Self {
        Self::new()
    }
}

impl Sim {
    /// Create a session with the default settings.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Create a session from settings.
    ///
    /// The initial angles are clamped into the limits.
    pub fn with_settings(settings: Settings) -> Self {
        let rules = settings.rules();
        let mut angles = Angles::default();
        rules.limits.clamp_all(&mut angles);
        Self {
            angles,
            rules,
            geo: Geometry::default(),
            presets: settings.presets,
            view: settings.view,
            driver: Driver::Idle,
            rec: Recorder::new(0.),
            binding: None,
            now: 0.,
        }
    }

    /// Current angles.
    pub fn angles(&self) -> &Angles {
        &self.angles
    }

    /// Current control rules.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Current link geometry.
    pub fn geometry(&self) -> &Geometry {
        &self.geo
    }

    /// Saved positions.
    pub fn presets(&self) -> &Presets {
        &self.presets
    }

    /// The active driver.
    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    /// The formula binding, if any.
    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    /// Joint positions of the current angles.
    pub fn pose(&self) -> Pose {
        self.geo.pose(&self.angles)
    }

    /// Limit flags of the current angles.
    pub fn at_limit(&self) -> [bool; 3] {
        self.rules.limits.at_limit(&self.angles)
    }

    /// The link under the cursor.
    pub fn hover(&self, cursor: [f64; 2]) -> Option<Joint> {
        self.geo.hover(&self.angles, cursor)
    }

    /// Recorded samples, oldest first.
    pub fn samples(&self) -> impl ExactSizeIterator<Item = &Sample> + '_ {
        self.rec.samples()
    }

    /// Snapshot of the persisted settings.
    pub fn settings(&self) -> Settings {
        Settings {
            limits: self.rules.limits,
            presets: self.presets,
            ratio: self.rules.ratio,
            allow_partial: self.rules.allow_partial,
            view: self.view,
        }
    }

    // Replace the driver unless a higher one is active
    fn start(&mut self, driver: Driver) -> bool {
        if driver.precedence() < self.driver.precedence() {
            return false;
        }
        self.driver = driver;
        true
    }

    // Derive the bound angle after a mutation
    fn derive(&mut self) -> Result<(), FormulaError> {
        let Some(binding) = &self.binding else {
            return Ok(());
        };
        if self.driver.dragging() == Some(binding.target) {
            return Ok(());
        }
        if let Err(e) = binding.apply(&mut self.angles, &self.rules.limits) {
            self.binding = None;
            return Err(e);
        }
        Ok(())
    }

    /// Apply an input.
    ///
    /// Return true if the input took effect. Starting a driver while a
    /// higher one is active is ignored and returns false.
    pub fn handle(&mut self, input: Input) -> Result<bool, SimError> {
        let applied = match input {
            Input::DragStart(joint) => self.start(Driver::Drag(joint)),
            Input::DragTo(cursor) => {
                let Driver::Drag(joint) = self.driver else {
                    return Ok(false);
                };
                match drag_angle(joint, cursor, &self.geo, &self.angles, &self.rules.limits) {
                    Some(deg) => self.angles[joint] = deg,
                    None => return Ok(false),
                }
                true
            }
            Input::DragEnd => self.stop(|d| matches!(d, Driver::Drag(_))),
            Input::Press(button) => self.start(Driver::Button(Hold::new(button))),
            Input::Release => self.stop(|d| matches!(d, Driver::Button(_))),
            Input::Joystick(x, y) => self.start(Driver::Joystick(Deflection::new(x, y))),
            Input::JoystickRelease => self.stop(|d| matches!(d, Driver::Joystick(_))),
            Input::Animate(targets) => {
                self.start(Driver::Seek(Seek::new(targets, &self.rules.limits)))
            }
            Input::GoTo(i) => {
                let preset = self.presets.get(i).ok_or(SimError::Preset(i))?;
                let seek = Seek::from_preset(preset, &self.rules.limits);
                self.start(Driver::Seek(seek))
            }
            Input::Save(i) => {
                let preset = self.presets.get_mut(i).ok_or(SimError::Preset(i))?;
                preset.save(&self.angles);
                return Ok(true);
            }
            Input::Limit(joint, min, max) => {
                self.rules.limits.set(joint, min, max)?;
                self.rules.limits.clamp_all(&mut self.angles);
                if let Driver::Seek(seek) = &mut self.driver {
                    *seek = Seek::new(seek.targets, &self.rules.limits);
                }
                true
            }
            Input::Ratio(ratio) => {
                self.rules.set_ratio(ratio);
                return Ok(true);
            }
            Input::AllowPartial(allow) => {
                self.rules.allow_partial = allow;
                return Ok(true);
            }
            Input::Formula(joint, Some(src)) => {
                self.binding = Some(Binding::new(joint, &src)?);
                true
            }
            Input::Formula(_, None) => {
                self.binding = None;
                return Ok(true);
            }
            Input::Layout(width, height) => {
                self.geo.layout(width, height);
                return Ok(true);
            }
            Input::ClearHistory => {
                self.rec.clear(self.now);
                return Ok(true);
            }
            Input::Reset => {
                *self = Self {
                    geo: self.geo,
                    rec: Recorder::new(self.now),
                    now: self.now,
                    ..Self::with_settings(Settings::reset())
                };
                return Ok(true);
            }
        };
        if applied {
            self.derive()?;
        }
        Ok(applied)
    }

    // Release the driver if it matches
    fn stop(&mut self, f: impl Fn(&Driver) -> bool) -> bool {
        if f(&self.driver) {
            self.driver = Driver::Idle;
            true
        } else {
            false
        }
    }

    /// Advance the session to `now` in milliseconds.
    ///
    /// A sample is recorded if due, then the active driver moves the angles.
    /// Return true if any angle changed.
    pub fn tick(&mut self, now: f64) -> Result<bool, SimError> {
        self.now = now;
        let label = match &self.driver {
            Driver::Button(hold) => Some(hold.button.label()),
            _ => None,
        };
        self.rec.record_if_due(now, &self.angles, label);
        let before = self.angles;
        match &mut self.driver {
            Driver::Idle | Driver::Drag(_) => return Ok(false),
            Driver::Button(hold) => {
                hold.tick(&mut self.angles, &self.rules);
            }
            Driver::Joystick(def) => {
                Control::Joystick(*def).step(&mut self.angles, &self.rules);
            }
            Driver::Seek(seek) => {
                if seek.tick(&mut self.angles, &self.rules.limits) {
                    self.driver = Driver::Idle;
                }
            }
        }
        if self.angles == before {
            return Ok(false);
        }
        self.derive()?;
        Ok(true)
    }
}
