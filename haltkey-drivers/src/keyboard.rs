//! Halt key pulse
//!
//! Turns the emitter's single-tick press decision into a press report,
//! holds the key for `dwell_ms`, then sends a release. Reports go through a
//! [`KeyboardSink`] that must never wait: a press that cannot be queued is
//! dropped (the next interval tries again), while a release is retried on
//! every update until it is accepted so the key cannot stick down.

use haltkey_core::config::KeypressConfig;
use haltkey_core::safety::SafetyState;
use haltkey_core::time::{has_elapsed, Millis};

/// Keyboard report queued for the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyReport {
    /// Key down with the given HID usage ID
    Press(u8),
    /// All keys up
    Release,
}

/// Reasons a report could not be queued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyError {
    /// Transport queue is full
    Busy,
    /// Host not attached or not configured
    Disconnected,
}

/// Non-blocking keyboard report sink
pub trait KeyboardSink {
    /// Queue a report without waiting
    fn try_send(&mut self, report: KeyReport) -> Result<(), KeyError>;
}

/// What the pulse did on an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseEvent {
    /// Press report queued
    Pressed,
    /// Release report queued
    Released,
    /// Press could not be queued and was dropped
    PressDropped(KeyError),
    /// Release could not be queued; reported once, retried every update
    ReleaseDeferred(KeyError),
}

/// Press/hold/release state for the halt key
pub struct KeyPulse<K> {
    sink: K,
    keycode: u8,
    /// Time the key is held down
    dwell_ms: Millis,
    /// Time the current press was queued
    pressed_at: Option<Millis>,
    /// A release failed and is being retried
    release_retrying: bool,
}

impl<K: KeyboardSink> KeyPulse<K> {
    /// Create a key pulse for the given key
    pub fn new(sink: K, keycode: u8, config: &KeypressConfig) -> Self {
        Self {
            sink,
            keycode,
            dwell_ms: config.dwell_ms,
            pressed_at: None,
            release_retrying: false,
        }
    }

    /// Advance the pulse
    ///
    /// # Arguments
    /// - `now`: Current time
    /// - `state`: Safety state this iteration; safe releases the key at once
    /// - `emit`: Emitter output this iteration
    ///
    /// A press that fires while the key is still held (a release still
    /// pending) releases first and presses again in the same update.
    pub fn update(&mut self, now: Millis, state: SafetyState, emit: bool) -> Option<PulseEvent> {
        if let Some(pressed_at) = self.pressed_at {
            let due = emit || state.is_safe() || has_elapsed(now, pressed_at, self.dwell_ms);
            if !due {
                return None;
            }

            if let Err(e) = self.release() {
                let first = !self.release_retrying;
                self.release_retrying = true;
                // A press cannot go out ahead of the pending release
                return if emit {
                    Some(PulseEvent::PressDropped(e))
                } else {
                    first.then_some(PulseEvent::ReleaseDeferred(e))
                };
            }

            if !emit {
                return Some(PulseEvent::Released);
            }
        }

        if emit {
            return Some(match self.sink.try_send(KeyReport::Press(self.keycode)) {
                Ok(()) => {
                    self.pressed_at = Some(now);
                    PulseEvent::Pressed
                }
                Err(e) => PulseEvent::PressDropped(e),
            });
        }

        None
    }

    /// Check if the key is currently held down
    pub fn is_pressed(&self) -> bool {
        self.pressed_at.is_some()
    }

    fn release(&mut self) -> Result<(), KeyError> {
        self.sink.try_send(KeyReport::Release)?;
        self.pressed_at = None;
        self.release_retrying = false;
        Ok(())
    }
}
