//! Hardware driver implementations
//!
//! This crate binds the logic in haltkey-core to hardware through the
//! `embedded-hal` 1.0 digital traits and a small keyboard sink trait:
//!
//! - Switch inputs with polarity and fail-safe read handling
//! - Indicator lights on GPIO outputs
//! - Halt key press/release pulse over a non-blocking keyboard sink
//! - USB host link tracking for the keyboard sink
//! - The station that runs one full control-loop iteration

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod indicator;
pub mod input;
pub mod keyboard;
pub mod link;
pub mod station;

pub use indicator::{GpioIndicator, IndicatorLights, LightFault};
pub use input::{InputSampler, Sample, SwitchInput};
pub use keyboard::{KeyError, KeyPulse, KeyReport, KeyboardSink, PulseEvent};
pub use link::HostLink;
pub use station::{HaltStation, StepReport};
