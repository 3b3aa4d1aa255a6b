//! USB device setup
//!
//! Enumerates as a HID keyboard and tracks whether the host can take
//! reports, so the control loop can tell a missing or sleeping host from a
//! full queue.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, State};
use embassy_usb::{Builder, Config, Handler, UsbDevice};
use static_cell::StaticCell;
use usbd_hid::descriptor::{KeyboardReport, SerializedDescriptor};

use haltkey_drivers::HostLink;

use crate::channels::USB_CONFIGURED;

/// pid.codes test VID/PID
const USB_VID: u16 = 0x1209;
const USB_PID: u16 = 0x0001;

/// Keyboard input report size
pub const REPORT_SIZE: usize = 8;

/// Host polling interval for the HID endpoint
const POLL_MS: u8 = 10;

pub type UsbDriver = Driver<'static, USB>;
pub type KeyboardWriter = HidWriter<'static, UsbDriver, REPORT_SIZE>;

// Descriptor and control buffers (must live as long as the device)
static CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static HID_STATE: StaticCell<State<'static>> = StaticCell::new();
static HANDLER: StaticCell<ConnectionHandler> = StaticCell::new();

/// Publishes the host link state to `USB_CONFIGURED`
struct ConnectionHandler {
    link: HostLink,
}

impl ConnectionHandler {
    fn publish(&self) {
        USB_CONFIGURED.store(self.link.is_usable(), Ordering::Relaxed);
    }
}

impl Handler for ConnectionHandler {
    fn enabled(&mut self, enabled: bool) {
        self.link.enabled(enabled);
        self.publish();
    }

    fn reset(&mut self) {
        self.link.reset();
        self.publish();
    }

    fn configured(&mut self, configured: bool) {
        self.link.configured(configured);
        self.publish();
        if configured {
            info!("USB configured by host");
        } else {
            warn!("USB configuration lost");
        }
    }

    fn suspended(&mut self, suspended: bool) {
        self.link.suspended(suspended);
        self.publish();
        if suspended {
            debug!("USB suspended");
        } else if self.link.is_configured() {
            debug!("USB resumed");
        }
    }
}

/// Build the USB device and its keyboard endpoint
pub fn build_usb(driver: UsbDriver) -> (UsbDevice<'static, UsbDriver>, KeyboardWriter) {
    let mut config = Config::new(USB_VID, USB_PID);
    config.manufacturer = Some("Haltkey");
    config.product = Some("Safety Stop Halt Key");
    config.serial_number = Some("HK-0001");
    config.max_power = 100;
    config.max_packet_size_0 = 64;

    let mut builder = Builder::new(
        driver,
        config,
        CONFIG_DESC.init([0; 256]),
        BOS_DESC.init([0; 256]),
        MSOS_DESC.init([0; 256]),
        CONTROL_BUF.init([0; 64]),
    );
    builder.handler(HANDLER.init(ConnectionHandler {
        link: HostLink::new(),
    }));

    let hid_config = HidConfig {
        report_descriptor: KeyboardReport::desc(),
        request_handler: None,
        poll_ms: POLL_MS,
        max_packet_size: REPORT_SIZE as u16,
    };
    let writer = HidWriter::<_, REPORT_SIZE>::new(&mut builder, HID_STATE.init(State::new()), hid_config);

    (builder.build(), writer)
}

/// USB task - runs the device state machine
#[embassy_executor::task]
pub async fn usb_task(mut usb: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB task started");
    usb.run().await
}
