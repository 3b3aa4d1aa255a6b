//! Switch inputs
//!
//! Reads the stop switch and key cylinder lines and produces an
//! [`InputSnapshot`]. A line that cannot be read counts as engaged, and a
//! disabled input always reads safe.

use embedded_hal::digital::InputPin;

use haltkey_core::config::SwitchConfig;
use haltkey_core::safety::{InputFault, InputSnapshot};

/// One switch input with wiring polarity
pub struct SwitchInput<P> {
    pin: P,
    /// If true, engaged = pin HIGH
    active_high: bool,
}

impl<P: InputPin> SwitchInput<P> {
    /// Create a switch input
    ///
    /// # Arguments
    /// - `pin`: The GPIO input pin
    /// - `active_high`: If true, the switch is engaged when the pin is HIGH
    pub fn new(pin: P, active_high: bool) -> Self {
        Self { pin, active_high }
    }

    /// Read whether the switch is engaged
    pub fn is_engaged(&mut self) -> Result<bool, P::Error> {
        Ok(self.pin.is_high()? == self.active_high)
    }

    /// Read the switch, treating a read failure as engaged
    fn read_fail_safe(&mut self) -> (bool, bool) {
        match self.is_engaged() {
            Ok(engaged) => (engaged, false),
            Err(_) => (true, true),
        }
    }
}

/// Result of one sampling pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// Logical input levels (faulted inputs read as engaged)
    pub snapshot: InputSnapshot,
    /// Inputs that could not be read this pass
    pub fault: Option<InputFault>,
}

/// Samples the stop switch and key cylinder
pub struct InputSampler<S, L> {
    stop: Option<SwitchInput<S>>,
    lock: Option<SwitchInput<L>>,
}

impl<S: InputPin, L: InputPin> InputSampler<S, L> {
    /// Create a sampler from the two pins and their configuration
    ///
    /// A disabled input's pin is dropped and never read again.
    pub fn new(stop_pin: S, lock_pin: L, stop: &SwitchConfig, lock: &SwitchConfig) -> Self {
        Self {
            stop: stop
                .enabled
                .then(|| SwitchInput::new(stop_pin, stop.active_high)),
            lock: lock
                .enabled
                .then(|| SwitchInput::new(lock_pin, lock.active_high)),
        }
    }

    /// Read both inputs
    pub fn sample(&mut self) -> Sample {
        let (stop_engaged, stop_fault) = match self.stop.as_mut() {
            Some(input) => input.read_fail_safe(),
            None => (false, false),
        };
        let (lock_locked, lock_fault) = match self.lock.as_mut() {
            Some(input) => input.read_fail_safe(),
            None => (false, false),
        };

        let fault = match (stop_fault, lock_fault) {
            (true, true) => Some(InputFault::Both),
            (true, false) => Some(InputFault::StopSwitch),
            (false, true) => Some(InputFault::LockCylinder),
            (false, false) => None,
        };

        Sample {
            snapshot: InputSnapshot::new(stop_engaged, lock_locked),
            fault,
        }
    }

    /// Check if the key cylinder is monitored
    pub fn lock_enabled(&self) -> bool {
        self.lock.is_some()
    }
}
