//! Z-frame library provides kinematics and control modes for a three-link
//! reclining wheelchair base.
//!
//! The mechanism is an open chain of three links:
//!
//! + Middle link, rotating about the fixed base pivot (`angle1`)
//! + Seat-pan link, rotating about the middle end (`angle2`)
//! + Backrest link, rotating about the seat end (`angle3`)
//!
//! ```
//! use z_frame::*;
//!
//! let mut sim = Sim::new();
//! sim.handle(Input::Press(Button::up(Actuator::Elevate))).unwrap();
//! for tick in 0..30 {
//!     sim.tick(tick as f64 * 1000. / 60.).unwrap();
//! }
//! let Angles { a1, a2, .. } = *sim.angles();
//! assert!((a1 - a2).abs() < 1e-9);
//! ```
#![cfg_attr(doc_cfg, feature(doc_cfg))]
pub use crate::{
    ctrl::*, drag::*, fk::*, formula::*, joint::*, limit::*, point::*, preset::*, rec::*, seek::*,
    sim::*,
};

#[cfg(feature = "csv")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "csv")))]
pub mod csv;
pub mod ctrl;
mod drag;
mod fk;
pub mod formula;
mod joint;
mod limit;
mod point;
mod preset;
mod rec;
mod seek;
mod sim;
#[cfg(test)]
mod tests;
