//! Inter-core communication
//!
//! The control loop on core 1 and the USB tasks on core 0 share only the
//! statics below. Core 1 never waits on either of them.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use portable_atomic::AtomicBool;

use haltkey_drivers::KeyReport;

/// Channel capacity for key reports (press + release per pulse, with slack)
const KEY_REPORT_QUEUE_SIZE: usize = 4;

/// Key reports from the control loop to the HID task
pub static KEY_REPORTS: Channel<CriticalSectionRawMutex, KeyReport, KEY_REPORT_QUEUE_SIZE> =
    Channel::new();

/// Set while the host has the USB device configured
pub static USB_CONFIGURED: AtomicBool = AtomicBool::new(false);
