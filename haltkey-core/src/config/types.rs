//! Device configuration types
//!
//! The configuration is fixed at build time. `build.rs` in the firmware
//! crate reads `device.toml` into these types with serde, checks it with
//! [`DeviceConfig::validate`], and embeds it as postcard bytes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::time::Millis;

/// Default interval between repeated halt keypresses
pub const DEFAULT_REPEAT_INTERVAL_MS: Millis = 5000;

/// Default time the halt key is held down per press
pub const DEFAULT_DWELL_MS: Millis = 250;

/// Default half-period of the ready LED blink (2 Hz)
pub const DEFAULT_BLINK_HALF_PERIOD_MS: Millis = 250;

/// Default minimum time the start LED stays lit after a press
pub const DEFAULT_START_HOLD_MS: Millis = 250;

/// Configuration for one switch input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SwitchConfig {
    /// Input is monitored; a disabled input always reads safe
    pub enabled: bool,
    /// Line high means engaged/locked
    ///
    /// The stock wiring pulls both lines down and the contacts close to
    /// 3V3 in the safe position, so high means safe (`false` here).
    pub active_high: bool,
}

impl SwitchConfig {
    /// Enabled input with active-low wiring
    pub const fn active_low() -> Self {
        Self {
            enabled: true,
            active_high: false,
        }
    }

    /// Disabled input
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            active_high: false,
        }
    }
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self::active_low()
    }
}

/// Halt keypress timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KeypressConfig {
    /// Interval between presses while unsafe (ms)
    pub repeat_interval_ms: Millis,
    /// Time the key is held down per press (ms)
    pub dwell_ms: Millis,
}

impl Default for KeypressConfig {
    fn default() -> Self {
        Self {
            repeat_interval_ms: DEFAULT_REPEAT_INTERVAL_MS,
            dwell_ms: DEFAULT_DWELL_MS,
        }
    }
}

/// Indicator light behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IndicatorMode {
    /// Ready steady while safe, blinking while unsafe; start lit per press
    #[default]
    Normal,
    /// Only the blinking ready light is used, and only while unsafe
    FlashingOnly,
    /// Both lights always off
    Disabled,
}

/// Indicator light configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IndicatorConfig {
    /// Which lights run and when
    pub mode: IndicatorMode,
    /// Ready LED on/off time while blinking (ms)
    pub blink_half_period_ms: Millis,
    /// Minimum time the start LED stays lit after a press (ms)
    pub start_hold_ms: Millis,
    /// Ready LED lit when the line is high
    pub ready_active_high: bool,
    /// Start LED lit when the line is high
    pub start_active_high: bool,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            mode: IndicatorMode::Normal,
            blink_half_period_ms: DEFAULT_BLINK_HALF_PERIOD_MS,
            start_hold_ms: DEFAULT_START_HOLD_MS,
            ready_active_high: true,
            start_active_high: true,
        }
    }
}

/// Diagnostics switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DebugConfig {
    /// Trace every change of the sampled inputs
    pub trace_io: bool,
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeviceConfig {
    /// Stop (E-stop) switch input
    pub stop_switch: SwitchConfig,
    /// Key cylinder input
    pub lock_cylinder: SwitchConfig,
    /// Halt keypress timing
    pub keypress: KeypressConfig,
    /// Indicator lights
    pub indicators: IndicatorConfig,
    /// Diagnostics
    pub debug: DebugConfig,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            stop_switch: SwitchConfig::active_low(),
            // Shipped units have no key cylinder fitted
            lock_cylinder: SwitchConfig::disabled(),
            keypress: KeypressConfig::default(),
            indicators: IndicatorConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

/// Configuration validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Neither input is enabled, so the device could never trip
    NoInputsEnabled,
    /// Repeat interval is zero
    ZeroRepeatInterval,
    /// Dwell is zero, so the host would never see the key down
    ZeroDwell,
    /// Dwell must end before the next press is due
    DwellNotShorterThanInterval,
    /// Blink half-period is zero
    ZeroBlinkPeriod,
    /// Start LED hold must end before the next press is due
    HoldNotShorterThanInterval,
}

impl DeviceConfig {
    /// Check the configuration for values the control loop cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.stop_switch.enabled && !self.lock_cylinder.enabled {
            return Err(ConfigError::NoInputsEnabled);
        }

        let keypress = &self.keypress;
        if keypress.repeat_interval_ms == 0 {
            return Err(ConfigError::ZeroRepeatInterval);
        }
        if keypress.dwell_ms == 0 {
            return Err(ConfigError::ZeroDwell);
        }
        if keypress.dwell_ms >= keypress.repeat_interval_ms {
            return Err(ConfigError::DwellNotShorterThanInterval);
        }

        let indicators = &self.indicators;
        if indicators.blink_half_period_ms == 0 {
            return Err(ConfigError::ZeroBlinkPeriod);
        }
        if indicators.start_hold_ms >= keypress.repeat_interval_ms {
            return Err(ConfigError::HoldNotShorterThanInterval);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = DeviceConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert!(config.stop_switch.enabled);
        assert!(!config.lock_cylinder.enabled);
        assert_eq!(config.keypress.repeat_interval_ms, 5000);
    }

    #[test]
    fn test_no_inputs_rejected() {
        let mut config = DeviceConfig::default();
        config.stop_switch = SwitchConfig::disabled();
        assert_eq!(config.validate(), Err(ConfigError::NoInputsEnabled));

        // Either input alone is enough
        config.lock_cylinder = SwitchConfig::active_low();
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_dwell_must_fit_interval() {
        let mut config = DeviceConfig::default();
        config.keypress.dwell_ms = 5000;
        assert_eq!(
            config.validate(),
            Err(ConfigError::DwellNotShorterThanInterval)
        );

        config.keypress.dwell_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroDwell));
    }

    #[test]
    fn test_zero_periods_rejected() {
        let mut config = DeviceConfig::default();
        config.keypress.repeat_interval_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroRepeatInterval));

        let mut config = DeviceConfig::default();
        config.indicators.blink_half_period_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroBlinkPeriod));
    }

    #[test]
    fn test_hold_must_fit_interval() {
        let mut config = DeviceConfig::default();
        config.indicators.start_hold_ms = 6000;
        assert_eq!(
            config.validate(),
            Err(ConfigError::HoldNotShorterThanInterval)
        );
    }
}
