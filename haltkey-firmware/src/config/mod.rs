//! Configuration loading
//!
//! `build.rs` validates device.toml and embeds it as postcard bytes. The
//! image is decoded once at boot; if that fails the built-in defaults are
//! used, which monitor the stop switch with stock wiring.

use defmt::*;

use haltkey_core::config::DeviceConfig;

/// Embedded configuration (compiled into firmware)
/// Edit device.toml and rebuild to customize
const EMBEDDED_CONFIG: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/device.postcard"));

/// Load the embedded configuration, falling back to defaults
pub fn load_config() -> DeviceConfig {
    decode_config(EMBEDDED_CONFIG)
}

fn decode_config(bytes: &[u8]) -> DeviceConfig {
    let config = match postcard::from_bytes::<DeviceConfig>(bytes) {
        Ok(config) => config,
        Err(e) => {
            // Only reachable if build.rs and the firmware disagree on the layout
            error!("Failed to decode embedded config: {:?}", Debug2Format(&e));
            error!("Using default configuration");
            return DeviceConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => {
            info!("Loaded embedded configuration");
            config
        }
        Err(e) => {
            error!("Embedded configuration invalid: {:?}", e);
            error!("Using default configuration");
            DeviceConfig::default()
        }
    }
}
