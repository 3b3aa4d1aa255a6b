//! GPIO indicator lights
//!
//! Drives the ready and start LEDs from an [`IndicatorState`]. Each LED can
//! be wired active-high (default) or active-low.

use embedded_hal::digital::OutputPin;

use haltkey_core::config::IndicatorConfig;
use haltkey_core::output::IndicatorState;

/// Single LED on a GPIO pin
pub struct GpioIndicator<P> {
    pin: P,
    /// If true, LED ON = pin LOW
    inverted: bool,
    /// Current logical state (true = lit)
    on: bool,
}

impl<P: OutputPin> GpioIndicator<P> {
    /// Create a new GPIO indicator
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to control
    /// - `active_high`: If false, the LED is lit when the pin is LOW
    pub fn new(pin: P, active_high: bool) -> Self {
        Self {
            pin,
            inverted: !active_high,
            on: false,
        }
    }

    /// Light or extinguish the LED
    pub fn set_on(&mut self, on: bool) -> Result<(), P::Error> {
        // Normal: on=true, inverted=false → high
        // Inverted: on=true, inverted=true → low
        if on != self.inverted {
            self.pin.set_high()?;
        } else {
            self.pin.set_low()?;
        }
        self.on = on;
        Ok(())
    }

    /// Check if the LED was last set lit
    pub fn is_on(&self) -> bool {
        self.on
    }
}

/// LED that could not be written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightFault {
    /// Ready LED write failed
    Ready,
    /// Start LED write failed
    Start,
}

/// The ready and start LEDs
pub struct IndicatorLights<R, S> {
    ready: GpioIndicator<R>,
    start: GpioIndicator<S>,
}

impl<R: OutputPin, S: OutputPin> IndicatorLights<R, S> {
    /// Create the light pair from pins and configuration
    pub fn new(ready_pin: R, start_pin: S, config: &IndicatorConfig) -> Self {
        Self {
            ready: GpioIndicator::new(ready_pin, config.ready_active_high),
            start: GpioIndicator::new(start_pin, config.start_active_high),
        }
    }

    /// Write both LEDs
    ///
    /// Both writes are always attempted; the first failure is reported.
    pub fn apply(&mut self, state: IndicatorState) -> Result<(), LightFault> {
        let ready = self.ready.set_on(state.ready_on);
        let start = self.start.set_on(state.start_on);

        ready.map_err(|_| LightFault::Ready)?;
        start.map_err(|_| LightFault::Start)
    }

    /// Currently displayed state
    pub fn state(&self) -> IndicatorState {
        IndicatorState {
            ready_on: self.ready.is_on(),
            start_on: self.start.is_on(),
        }
    }
}
