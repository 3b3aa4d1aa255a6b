//! Board-agnostic core logic for the safety-stop firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Time source abstraction and wrapping millisecond arithmetic
//! - Safety state derived from the stop switch and key cylinder
//! - Halt keypress cadence and indicator light rules
//! - The per-iteration controller composing the above
//! - Configuration type definitions and validation
//!
//! Nothing here sleeps or waits. Every decision is a comparison between a
//! timestamp passed in by the caller and one stored from an earlier tick.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod output;
pub mod safety;
pub mod time;

/// HID usage ID of the key typed at the host while unsafe (Escape)
pub const HALT_KEYCODE: u8 = 0x29;
