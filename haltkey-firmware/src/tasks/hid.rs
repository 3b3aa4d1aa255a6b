//! HID keyboard task
//!
//! Drains `KEY_REPORTS` and writes each entry to the host as an 8-byte
//! keyboard report. Reports are sent in queue order so a press is always
//! followed by its release.

use defmt::*;
use usbd_hid::descriptor::KeyboardReport;

use haltkey_drivers::KeyReport;

use super::usb::KeyboardWriter;
use crate::channels::KEY_REPORTS;

/// Convert a queued report to the HID wire form
fn to_hid(report: KeyReport) -> KeyboardReport {
    let mut keycodes = [0u8; 6];
    if let KeyReport::Press(key) = report {
        keycodes[0] = key;
    }
    KeyboardReport {
        modifier: 0,
        reserved: 0,
        leds: 0,
        keycodes,
    }
}

/// HID task - forwards key reports to the host
#[embassy_executor::task]
pub async fn hid_task(mut writer: KeyboardWriter) {
    info!("HID task started");

    loop {
        let report = KEY_REPORTS.receive().await;

        // Wait for the host to configure the endpoint
        writer.ready().await;

        if let Err(e) = writer.write_serialize(&to_hid(report)).await {
            warn!("HID write failed for {}: {:?}", report, e);
        }
    }
}
