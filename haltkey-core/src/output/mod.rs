//! Output decisions
//!
//! Timed logic that turns the safety state into halt keypresses and
//! indicator light states. Each component owns its own timestamps and is
//! advanced only by its `tick` call.

pub mod indicator;
pub mod keypress;

pub use indicator::{IndicatorDriver, IndicatorState};
pub use keypress::KeypressEmitter;
