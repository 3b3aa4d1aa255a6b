//! Safety monitoring
//!
//! Derives the system-wide safe/unsafe condition from the two physical
//! inputs. The derivation is stateless; timing lives in `crate::output`.

pub mod state;

pub use state::{InputFault, InputSnapshot, SafetyState};
