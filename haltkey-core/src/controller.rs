//! Per-iteration controller
//!
//! Composes safety derivation, the keypress emitter and the indicator driver
//! into one tick: snapshot in, output decisions out. Time is passed in by
//! the caller so the whole path can be driven by a fake clock in tests.

use crate::config::DeviceConfig;
use crate::output::{IndicatorDriver, IndicatorState, KeypressEmitter};
use crate::safety::{InputSnapshot, SafetyState};
use crate::time::Millis;

/// Change of the safety state between two ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    /// Safe to unsafe: stop engaged or key locked
    Tripped(InputSnapshot),
    /// Unsafe to safe: both inputs released
    Cleared,
}

/// Output decisions for one iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutput {
    /// Safety state derived this tick
    pub state: SafetyState,
    /// Press the halt key now
    pub emit: bool,
    /// Desired indicator light states
    pub indicators: IndicatorState,
    /// Safety state change since the previous tick
    pub transition: Option<Transition>,
}

/// Safety-stop controller
#[derive(Debug, Clone)]
pub struct HaltController {
    /// State derived on the previous tick
    state: SafetyState,
    /// Halt keypress cadence
    emitter: KeypressEmitter,
    /// Indicator light rules
    indicators: IndicatorDriver,
}

impl HaltController {
    /// Create a controller from the device configuration
    ///
    /// Starts in the safe state; the first tick re-derives it from the
    /// live inputs.
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            state: SafetyState::Safe,
            emitter: KeypressEmitter::from_config(&config.keypress),
            indicators: IndicatorDriver::new(&config.indicators),
        }
    }

    /// Run one iteration
    pub fn tick(&mut self, now: Millis, snapshot: InputSnapshot) -> TickOutput {
        let state = SafetyState::derive(snapshot);

        let transition = match (self.state, state) {
            (SafetyState::Safe, SafetyState::Unsafe) => Some(Transition::Tripped(snapshot)),
            (SafetyState::Unsafe, SafetyState::Safe) => Some(Transition::Cleared),
            _ => None,
        };
        self.state = state;

        let emit = self.emitter.tick(now, state);
        let indicators = self.indicators.tick(now, state, emit);

        TickOutput {
            state,
            emit,
            indicators,
            transition,
        }
    }

    /// Safety state derived on the last tick
    pub fn state(&self) -> SafetyState {
        self.state
    }

    /// Indicator states to show before the first tick
    pub fn initial_indicators(&self) -> IndicatorState {
        self.indicators.initial()
    }
}
