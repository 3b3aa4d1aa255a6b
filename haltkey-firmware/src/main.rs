//! Haltkey - Safety Stop USB Halt Key Firmware
//!
//! Watches an emergency-stop switch and a key cylinder. While either says
//! "stop", the board types ESC into the attached host every few seconds and
//! blinks the ready light.
//!
//! Core 0 runs the embassy executor with the USB stack. Core 1 runs the
//! control loop on its own, so input sampling never waits on USB.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use static_cell::ConstStaticCell;
use {defmt_rtt as _, panic_probe as _};

mod channels;
mod config;
mod control;
mod tasks;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

/// Core 1 stack size in bytes
const CORE1_STACK_SIZE: usize = 4096;

static CORE1_STACK: ConstStaticCell<Stack<CORE1_STACK_SIZE>> = ConstStaticCell::new(Stack::new());

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Haltkey firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load_config();
    let trace_io = config.debug.trace_io;

    // Pin assignments are board-specific (QT Py RP2040):
    // stop switch = RX (GPIO5), key cylinder = MISO (GPIO4),
    // ready LED = TX (GPIO20), start LED = SDA (GPIO24)
    // Inputs pull down so a cut wire reads as the engaged state
    let stop_pin = Input::new(p.PIN_5, Pull::Down);
    let lock_pin = Input::new(p.PIN_4, Pull::Down);
    let ready_pin = Output::new(p.PIN_20, Level::Low);
    let start_pin = Output::new(p.PIN_24, Level::Low);

    // USB HID keyboard on core 0
    let (usb, writer) = tasks::build_usb(Driver::new(p.USB, Irqs));
    spawner.spawn(tasks::usb_task(usb)).unwrap();
    spawner.spawn(tasks::hid_task(writer)).unwrap();
    info!("USB keyboard initialized");

    // Control loop on core 1
    let station = control::build_station(&config, stop_pin, lock_pin, ready_pin, start_pin);
    spawn_core1(p.CORE1, CORE1_STACK.take(), move || {
        control::run(station, trace_io)
    });

    info!("Control loop spawned, firmware running");

    // Main task has nothing else to do - all work happens elsewhere
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
