//! Build script for haltkey-firmware
//!
//! - Sets up linker search paths and scripts for memory.x
//! - Validates device.toml at compile time and embeds it as postcard bytes

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use haltkey_core::config::DeviceConfig;

fn main() {
    setup_linker();
    embed_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate device.toml and write the encoded config to OUT_DIR
fn embed_config() {
    // Re-run if device.toml changes
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");

    // Check if config file exists
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a device.toml configuration file.         ║\n\
            ║  Please create one in the haltkey-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    // Read the config file
    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse into the typed config; unknown enum values and bad types fail here
    let config: DeviceConfig = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid device.toml                                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    // Semantic checks shared with the firmware
    if let Err(e) = config.validate() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid device configuration                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(describe(&config, e).as_str())
        );
    }

    let encoded = postcard::to_stdvec(&config).unwrap();
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("device.postcard"), encoded).unwrap();

    if !config.lock_cylinder.enabled {
        println!("cargo:warning=device.toml: key cylinder input disabled");
    }
    println!("cargo:warning=device.toml validated successfully");
}

/// Human-readable explanation of a validation error
fn describe(config: &DeviceConfig, error: haltkey_core::config::ConfigError) -> String {
    use haltkey_core::config::ConfigError::*;

    let keypress = &config.keypress;
    match error {
        NoInputsEnabled => {
            "[stop_switch] and [lock_cylinder] are both disabled - enable at least one".into()
        }
        ZeroRepeatInterval => "[keypress] repeat_interval_ms must be greater than 0".into(),
        ZeroDwell => "[keypress] dwell_ms must be greater than 0".into(),
        DwellNotShorterThanInterval => format!(
            "[keypress] dwell_ms ({}) must be less than repeat_interval_ms ({})",
            keypress.dwell_ms, keypress.repeat_interval_ms
        ),
        ZeroBlinkPeriod => "[indicators] blink_half_period_ms must be greater than 0".into(),
        HoldNotShorterThanInterval => format!(
            "[indicators] start_hold_ms ({}) must be less than repeat_interval_ms ({})",
            config.indicators.start_hold_ms, keypress.repeat_interval_ms
        ),
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
