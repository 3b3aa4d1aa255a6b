//! Halt keypress cadence
//!
//! Decides the instants at which the halt key is sent to the host. The
//! first unsafe tick fires at once; after that a press is due every
//! `repeat_interval_ms` for as long as the device stays unsafe. Holding and
//! releasing the key is left to the output sink.

use crate::config::KeypressConfig;
use crate::safety::SafetyState;
use crate::time::{has_elapsed, Millis};

/// Repeating halt keypress trigger
#[derive(Debug, Clone)]
pub struct KeypressEmitter {
    /// Interval between presses while unsafe
    repeat_interval_ms: Millis,
    /// Time of the last press in the current unsafe period
    last_assert: Option<Millis>,
    /// A press fired on the most recent tick
    asserted: bool,
}

impl KeypressEmitter {
    /// Create an emitter with the given repeat interval
    pub const fn new(repeat_interval_ms: Millis) -> Self {
        Self {
            repeat_interval_ms,
            last_assert: None,
            asserted: false,
        }
    }

    /// Create an emitter from the keypress configuration
    pub const fn from_config(config: &KeypressConfig) -> Self {
        Self::new(config.repeat_interval_ms)
    }

    /// Advance the emitter and report whether to press the halt key now
    ///
    /// A safe tick clears the stored press time, so the next unsafe period
    /// starts with an immediate press instead of waiting out an old interval.
    pub fn tick(&mut self, now: Millis, state: SafetyState) -> bool {
        self.asserted = match state {
            SafetyState::Safe => {
                self.last_assert = None;
                false
            }
            SafetyState::Unsafe => {
                let due = match self.last_assert {
                    None => true,
                    Some(last) => has_elapsed(now, last, self.repeat_interval_ms),
                };
                if due {
                    self.last_assert = Some(now);
                }
                due
            }
        };

        self.asserted
    }

    /// A press fired on the most recent tick
    pub fn asserted(&self) -> bool {
        self.asserted
    }

    /// Time of the last press in the current unsafe period
    pub fn last_assert(&self) -> Option<Millis> {
        self.last_assert
    }
}

impl Default for KeypressEmitter {
    fn default() -> Self {
        Self::from_config(&KeypressConfig::default())
    }
}
