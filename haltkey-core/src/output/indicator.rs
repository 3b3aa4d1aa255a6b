//! Indicator light rules
//!
//! Two lights sit on the enclosure:
//!
//! - **Ready**: steady while safe, fast blink while unsafe. The blink starts
//!   in the off phase on the tick the device becomes unsafe, so the change
//!   is visible at once.
//! - **Start**: lit when a halt keypress fires and held for
//!   `start_hold_ms`, since a single loop iteration is far too short to see.
//!
//! [`IndicatorMode`] can restrict the lights to the unsafe period only or
//! turn them off entirely.

use crate::config::{IndicatorConfig, IndicatorMode};
use crate::safety::SafetyState;
use crate::time::{elapsed_ms, has_elapsed, Millis};

/// Desired light states for one iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorState {
    /// Ready light lit
    pub ready_on: bool,
    /// Start light lit
    pub start_on: bool,
}

impl IndicatorState {
    /// Both lights off
    pub const OFF: Self = Self {
        ready_on: false,
        start_on: false,
    };
}

/// Indicator light driver
#[derive(Debug, Clone)]
pub struct IndicatorDriver {
    mode: IndicatorMode,
    /// Ready light on/off time while blinking
    blink_half_period_ms: Millis,
    /// Minimum start light on time after a press
    start_hold_ms: Millis,
    /// Current blink phase (true = lit)
    blink_on: bool,
    /// Time of the last blink toggle; `None` while safe
    last_toggle: Option<Millis>,
    /// Time the start light was last lit by a press
    start_lit_at: Option<Millis>,
}

impl IndicatorDriver {
    /// Create a driver from the indicator configuration
    pub const fn new(config: &IndicatorConfig) -> Self {
        Self {
            mode: config.mode,
            blink_half_period_ms: config.blink_half_period_ms,
            start_hold_ms: config.start_hold_ms,
            blink_on: false,
            last_toggle: None,
            start_lit_at: None,
        }
    }

    /// Light states before the first sample has been taken
    ///
    /// The device is assumed safe until the inputs say otherwise.
    pub fn initial(&self) -> IndicatorState {
        let safe = IndicatorState {
            ready_on: true,
            start_on: false,
        };
        self.apply_mode(SafetyState::Safe, safe)
    }

    /// Advance the driver and return the light states for this iteration
    ///
    /// `asserted` is the keypress emitter output for the same iteration.
    pub fn tick(&mut self, now: Millis, state: SafetyState, asserted: bool) -> IndicatorState {
        let raw = match state {
            SafetyState::Safe => {
                // Reset so the next unsafe period starts a fresh blink cycle
                self.blink_on = false;
                self.last_toggle = None;
                self.start_lit_at = None;
                IndicatorState {
                    ready_on: true,
                    start_on: false,
                }
            }
            SafetyState::Unsafe => {
                self.advance_blink(now);
                IndicatorState {
                    ready_on: self.blink_on,
                    start_on: self.advance_start(now, asserted),
                }
            }
        };

        self.apply_mode(state, raw)
    }

    fn advance_blink(&mut self, now: Millis) {
        match self.last_toggle {
            None => {
                self.blink_on = false;
                self.last_toggle = Some(now);
            }
            Some(last) if has_elapsed(now, last, self.blink_half_period_ms) => {
                self.blink_on = !self.blink_on;
                self.last_toggle = Some(now);
            }
            Some(_) => {}
        }
    }

    fn advance_start(&mut self, now: Millis, asserted: bool) -> bool {
        if asserted {
            self.start_lit_at = Some(now);
            return true;
        }

        match self.start_lit_at {
            Some(lit_at) if elapsed_ms(now, lit_at) < self.start_hold_ms => true,
            Some(_) => {
                // Forget the press so a clock rollover cannot relight it
                self.start_lit_at = None;
                false
            }
            None => false,
        }
    }

    fn apply_mode(&self, state: SafetyState, raw: IndicatorState) -> IndicatorState {
        match self.mode {
            IndicatorMode::Normal => raw,
            IndicatorMode::FlashingOnly => IndicatorState {
                ready_on: state.is_unsafe() && raw.ready_on,
                start_on: false,
            },
            IndicatorMode::Disabled => IndicatorState::OFF,
        }
    }
}

impl Default for IndicatorDriver {
    fn default() -> Self {
        Self::new(&IndicatorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn driver(mode: IndicatorMode) -> IndicatorDriver {
        IndicatorDriver::new(&IndicatorConfig {
            mode,
            blink_half_period_ms: 250,
            start_hold_ms: 100,
            ..Default::default()
        })
    }

    #[test]
    fn test_safe_is_steady_ready() {
        let mut ind = driver(IndicatorMode::Normal);
        assert!(ind.initial().ready_on);
        for t in (0..5000).step_by(10) {
            let out = ind.tick(t, SafetyState::Safe, false);
            assert!(out.ready_on);
            assert!(!out.start_on);
        }
    }

    #[test]
    fn test_unsafe_blinks() {
        let mut ind = driver(IndicatorMode::Normal);

        // Off phase starts on the entry tick
        assert!(!ind.tick(1000, SafetyState::Unsafe, false).ready_on);
        assert!(!ind.tick(1249, SafetyState::Unsafe, false).ready_on);
        assert!(ind.tick(1250, SafetyState::Unsafe, false).ready_on);
        assert!(ind.tick(1499, SafetyState::Unsafe, false).ready_on);
        assert!(!ind.tick(1500, SafetyState::Unsafe, false).ready_on);
    }

    #[test]
    fn test_return_to_safe_restores_ready() {
        let mut ind = driver(IndicatorMode::Normal);
        ind.tick(0, SafetyState::Unsafe, true);
        ind.tick(250, SafetyState::Unsafe, false);
        let out = ind.tick(260, SafetyState::Safe, false);
        assert_eq!(
            out,
            IndicatorState {
                ready_on: true,
                start_on: false
            }
        );

        // New unsafe period starts with the off phase again
        assert!(!ind.tick(270, SafetyState::Unsafe, false).ready_on);
    }

    #[test]
    fn test_start_held_after_press() {
        let mut ind = driver(IndicatorMode::Normal);
        assert!(ind.tick(0, SafetyState::Unsafe, true).start_on);
        assert!(ind.tick(50, SafetyState::Unsafe, false).start_on);
        assert!(ind.tick(99, SafetyState::Unsafe, false).start_on);
        assert!(!ind.tick(100, SafetyState::Unsafe, false).start_on);
        assert!(!ind.tick(4000, SafetyState::Unsafe, false).start_on);
        assert!(ind.tick(5000, SafetyState::Unsafe, true).start_on);
    }

    #[test]
    fn test_start_cleared_on_safe() {
        let mut ind = driver(IndicatorMode::Normal);
        assert!(ind.tick(0, SafetyState::Unsafe, true).start_on);
        assert!(!ind.tick(10, SafetyState::Safe, false).start_on);
    }

    #[test]
    fn test_zero_hold_tracks_pulse() {
        let mut ind = IndicatorDriver::new(&IndicatorConfig {
            start_hold_ms: 0,
            ..Default::default()
        });
        assert!(ind.tick(0, SafetyState::Unsafe, true).start_on);
        assert!(!ind.tick(0, SafetyState::Unsafe, false).start_on);
    }

    #[test]
    fn test_flashing_only_mode() {
        let mut ind = driver(IndicatorMode::FlashingOnly);
        assert_eq!(ind.initial(), IndicatorState::OFF);
        assert_eq!(ind.tick(0, SafetyState::Safe, false), IndicatorState::OFF);

        // Start light never used, ready blinks
        let out = ind.tick(10, SafetyState::Unsafe, true);
        assert_eq!(out, IndicatorState::OFF);
        let out = ind.tick(260, SafetyState::Unsafe, false);
        assert!(out.ready_on);
        assert!(!out.start_on);
    }

    #[test]
    fn test_disabled_mode() {
        let mut ind = driver(IndicatorMode::Disabled);
        assert_eq!(ind.initial(), IndicatorState::OFF);
        for t in (0..2000).step_by(10) {
            let state = if t < 1000 {
                SafetyState::Safe
            } else {
                SafetyState::Unsafe
            };
            assert_eq!(ind.tick(t, state, t == 1000), IndicatorState::OFF);
        }
    }

    proptest! {
        #[test]
        fn blink_alternates_at_fixed_rate(start in any::<u32>(), half in 50u32..400) {
            let mut ind = IndicatorDriver::new(&IndicatorConfig {
                blink_half_period_ms: half,
                ..Default::default()
            });

            // 1 ms loop: every half-period boundary flips the phase exactly once
            let mut toggles = 0u32;
            let mut prev = ind.tick(start, SafetyState::Unsafe, false).ready_on;
            prop_assert!(!prev);
            for offset in 1..=(half * 6) {
                let now = start.wrapping_add(offset);
                let out = ind.tick(now, SafetyState::Unsafe, false);
                if out.ready_on != prev {
                    toggles += 1;
                    prop_assert_eq!(offset % half, 0);
                }
                prev = out.ready_on;
            }
            prop_assert_eq!(toggles, 6);
        }
    }
}
