//! Safety control loop (core 1)
//!
//! Samples the inputs and drives the LEDs and halt key as fast as the core
//! runs. The loop never awaits: key reports go to core 0 through
//! `KEY_REPORTS` with `try_send`, so a stalled host cannot delay a read of
//! the stop switch.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_time::Instant;

use haltkey_core::config::DeviceConfig;
use haltkey_core::controller::Transition;
use haltkey_core::safety::{InputFault, InputSnapshot};
use haltkey_core::time::{Clock, Millis};
use haltkey_drivers::{
    HaltStation, IndicatorLights, InputSampler, KeyError, KeyReport, KeyboardSink, LightFault,
    PulseEvent, StepReport,
};

use crate::channels::{KEY_REPORTS, USB_CONFIGURED};

/// Milliseconds since boot from the embassy time driver
pub struct EmbassyClock {
    start: Instant,
}

impl EmbassyClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for EmbassyClock {
    fn now_ms(&self) -> Millis {
        // Truncation wraps after ~49 days; time math is wrapping
        self.start.elapsed().as_millis() as u32
    }
}

/// Keyboard sink feeding the HID task on core 0
pub struct ChannelKeyboard;

impl KeyboardSink for ChannelKeyboard {
    fn try_send(&mut self, report: KeyReport) -> Result<(), KeyError> {
        if !USB_CONFIGURED.load(Ordering::Relaxed) {
            return Err(KeyError::Disconnected);
        }
        KEY_REPORTS.try_send(report).map_err(|_| KeyError::Busy)
    }
}

/// The station as wired on the board
pub type Station = HaltStation<
    EmbassyClock,
    Input<'static>,
    Input<'static>,
    Output<'static>,
    Output<'static>,
    ChannelKeyboard,
>;

/// Assemble the station from board pins
pub fn build_station(
    config: &DeviceConfig,
    stop_pin: Input<'static>,
    lock_pin: Input<'static>,
    ready_pin: Output<'static>,
    start_pin: Output<'static>,
) -> Station {
    let sampler = InputSampler::new(stop_pin, lock_pin, &config.stop_switch, &config.lock_cylinder);
    if !sampler.lock_enabled() {
        info!("Key cylinder input disabled");
    }
    let lights = IndicatorLights::new(ready_pin, start_pin, &config.indicators);

    HaltStation::new(
        config,
        EmbassyClock::new(),
        sampler,
        lights,
        ChannelKeyboard,
    )
}

/// Edge detector for loop logging
///
/// Logs only on changes so a loop running at full speed does not flood RTT.
struct LoopLog {
    trace_io: bool,
    snapshot: InputSnapshot,
    fault: Option<InputFault>,
    light_fault: Option<LightFault>,
}

impl LoopLog {
    fn new(trace_io: bool) -> Self {
        Self {
            trace_io,
            snapshot: InputSnapshot::SAFE,
            fault: None,
            light_fault: None,
        }
    }

    fn record(&mut self, report: &StepReport) {
        match report.output.transition {
            Some(Transition::Tripped(snapshot)) => warn!(
                "UNSAFE at {}ms: stop={} locked={}",
                report.now, snapshot.stop_engaged, snapshot.lock_locked
            ),
            Some(Transition::Cleared) => info!("SAFE at {}ms", report.now),
            None => {}
        }

        if report.fault != self.fault {
            match report.fault {
                Some(fault) => error!("Input read failed: {}", fault),
                None => info!("Input reads recovered"),
            }
            self.fault = report.fault;
        }

        match report.key {
            Some(PulseEvent::Pressed) => debug!("Halt key pressed at {}ms", report.now),
            Some(PulseEvent::Released) => debug!("Halt key released at {}ms", report.now),
            Some(PulseEvent::PressDropped(e)) => warn!("Halt key press dropped: {}", e),
            Some(PulseEvent::ReleaseDeferred(e)) => warn!("Halt key release pending: {}", e),
            None => {}
        }

        if report.light_fault != self.light_fault {
            if let Some(fault) = report.light_fault {
                error!("Indicator write failed: {}", fault);
            }
            self.light_fault = report.light_fault;
        }

        if self.trace_io && report.snapshot != self.snapshot {
            debug!(
                "Inputs at {}ms: stop={} locked={}",
                report.now,
                report.snapshot.stop_engaged,
                report.snapshot.lock_locked
            );
        }
        self.snapshot = report.snapshot;
    }
}

/// Run the control loop forever
pub fn run(mut station: Station, trace_io: bool) -> ! {
    info!("Control loop started on core 1");

    let mut log = LoopLog::new(trace_io);
    loop {
        let report = station.step();
        log.record(&report);
    }
}
