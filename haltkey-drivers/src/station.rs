//! Control-loop iteration
//!
//! [`HaltStation`] owns everything one iteration touches: the clock, the
//! input sampler, the controller, the lights and the key pulse. The
//! firmware calls [`HaltStation::step`] in a tight loop; nothing in a step
//! waits on hardware or the host.

use embedded_hal::digital::{InputPin, OutputPin};

use haltkey_core::config::DeviceConfig;
use haltkey_core::controller::{HaltController, TickOutput};
use haltkey_core::safety::{InputFault, InputSnapshot};
use haltkey_core::time::{Clock, Millis};
use haltkey_core::HALT_KEYCODE;

use crate::indicator::{IndicatorLights, LightFault};
use crate::input::InputSampler;
use crate::keyboard::{KeyPulse, KeyboardSink, PulseEvent};

/// Everything that happened in one iteration, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepReport {
    /// Time the iteration was sampled
    pub now: Millis,
    /// Sampled inputs
    pub snapshot: InputSnapshot,
    /// Inputs that could not be read
    pub fault: Option<InputFault>,
    /// Controller decisions
    pub output: TickOutput,
    /// Key pulse activity
    pub key: Option<PulseEvent>,
    /// LED write failure
    pub light_fault: Option<LightFault>,
}

/// One safety-stop station: inputs, logic and outputs
pub struct HaltStation<C, S, L, R, T, K> {
    clock: C,
    sampler: InputSampler<S, L>,
    controller: HaltController,
    lights: IndicatorLights<R, T>,
    key: KeyPulse<K>,
}

impl<C, S, L, R, T, K> HaltStation<C, S, L, R, T, K>
where
    C: Clock,
    S: InputPin,
    L: InputPin,
    R: OutputPin,
    T: OutputPin,
    K: KeyboardSink,
{
    /// Assemble a station and show the initial light states
    pub fn new(
        config: &DeviceConfig,
        clock: C,
        sampler: InputSampler<S, L>,
        mut lights: IndicatorLights<R, T>,
        keyboard: K,
    ) -> Self {
        let controller = HaltController::new(config);
        // Best effort; the first step rewrites both LEDs anyway
        let _ = lights.apply(controller.initial_indicators());

        Self {
            clock,
            sampler,
            controller,
            lights,
            key: KeyPulse::new(keyboard, HALT_KEYCODE, &config.keypress),
        }
    }

    /// Run one iteration: sample, decide, write outputs
    pub fn step(&mut self) -> StepReport {
        let now = self.clock.now_ms();
        let sample = self.sampler.sample();
        let output = self.controller.tick(now, sample.snapshot);
        let key = self.key.update(now, output.state, output.emit);
        let light_fault = self.lights.apply(output.indicators).err();

        StepReport {
            now,
            snapshot: sample.snapshot,
            fault: sample.fault,
            output,
            key,
            light_fault,
        }
    }

    /// Check if the halt key is currently held down
    pub fn key_pressed(&self) -> bool {
        self.key.is_pressed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::{KeyError, KeyReport};
    use core::cell::{Cell, RefCell};
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorKind, ErrorType};
    use haltkey_core::config::SwitchConfig;
    use haltkey_core::controller::Transition;
    use haltkey_core::safety::SafetyState;

    struct MockClock<'a>(&'a Cell<Millis>);

    impl Clock for MockClock<'_> {
        fn now_ms(&self) -> Millis {
            self.0.get()
        }
    }

    /// Input pin; `None` simulates a read failure
    struct MockInput<'a>(&'a Cell<Option<bool>>);

    impl ErrorType for MockInput<'_> {
        type Error = ErrorKind;
    }

    impl InputPin for MockInput<'_> {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            self.0.get().ok_or(ErrorKind::Other)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|high| !high)
        }
    }

    struct MockLed<'a>(&'a Cell<bool>);

    impl ErrorType for MockLed<'_> {
        type Error = Infallible;
    }

    impl OutputPin for MockLed<'_> {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.0.set(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.0.set(true);
            Ok(())
        }
    }

    struct MockKeyboard<'a> {
        sent: &'a RefCell<Vec<(Millis, KeyReport)>>,
        clock: &'a Cell<Millis>,
        busy: &'a Cell<bool>,
    }

    impl KeyboardSink for MockKeyboard<'_> {
        fn try_send(&mut self, report: KeyReport) -> Result<(), KeyError> {
            if self.busy.get() {
                return Err(KeyError::Busy);
            }
            self.sent.borrow_mut().push((self.clock.get(), report));
            Ok(())
        }
    }

    /// Shared state the mocks read from and write to
    #[derive(Default)]
    struct Bench {
        now: Cell<Millis>,
        stop: Cell<Option<bool>>,
        lock: Cell<Option<bool>>,
        ready: Cell<bool>,
        start: Cell<bool>,
        sent: RefCell<Vec<(Millis, KeyReport)>>,
        busy: Cell<bool>,
    }

    impl Bench {
        fn new() -> Self {
            let bench = Self::default();
            // Stock wiring: line high = safe
            bench.stop.set(Some(true));
            bench.lock.set(Some(true));
            bench
        }

        fn station(
            &self,
            config: &DeviceConfig,
        ) -> HaltStation<
            MockClock<'_>,
            MockInput<'_>,
            MockInput<'_>,
            MockLed<'_>,
            MockLed<'_>,
            MockKeyboard<'_>,
        > {
            let sampler = InputSampler::new(
                MockInput(&self.stop),
                MockInput(&self.lock),
                &config.stop_switch,
                &config.lock_cylinder,
            );
            let lights = IndicatorLights::new(
                MockLed(&self.ready),
                MockLed(&self.start),
                &config.indicators,
            );
            let keyboard = MockKeyboard {
                sent: &self.sent,
                clock: &self.now,
                busy: &self.busy,
            };
            HaltStation::new(config, MockClock(&self.now), sampler, lights, keyboard)
        }
    }

    #[test]
    fn test_initial_lights() {
        let bench = Bench::new();
        let _station = bench.station(&DeviceConfig::default());
        assert!(bench.ready.get());
        assert!(!bench.start.get());
    }

    #[test]
    fn test_stop_timeline() {
        let bench = Bench::new();
        let mut station = bench.station(&DeviceConfig::default());

        for t in (0..30_000).step_by(10) {
            bench.now.set(t);
            bench.stop.set(Some(!(10_000..22_000).contains(&t)));
            let report = station.step();

            if t == 10_000 {
                assert!(matches!(
                    report.output.transition,
                    Some(Transition::Tripped(_))
                ));
            }
            if t == 22_000 {
                assert_eq!(report.output.transition, Some(Transition::Cleared));
            }
            // Start LED tracks the key being held
            assert_eq!(bench.start.get(), station.key_pressed());
        }

        let sent = bench.sent.borrow();
        assert_eq!(
            *sent,
            [
                (10_000, KeyReport::Press(HALT_KEYCODE)),
                (10_250, KeyReport::Release),
                (15_000, KeyReport::Press(HALT_KEYCODE)),
                (15_250, KeyReport::Release),
                (20_000, KeyReport::Press(HALT_KEYCODE)),
                (20_250, KeyReport::Release),
            ]
        );
        assert!(bench.ready.get());
        assert!(!bench.start.get());
    }

    #[test]
    fn test_lock_cylinder_when_enabled() {
        let bench = Bench::new();
        let mut config = DeviceConfig::default();
        config.lock_cylinder = SwitchConfig::active_low();
        let mut station = bench.station(&config);

        bench.lock.set(Some(false));
        let report = station.step();
        assert_eq!(report.output.state, SafetyState::Unsafe);
        assert_eq!(report.key, Some(PulseEvent::Pressed));
    }

    #[test]
    fn test_lock_cylinder_ignored_when_disabled() {
        let bench = Bench::new();
        let mut station = bench.station(&DeviceConfig::default());

        bench.lock.set(Some(false));
        let report = station.step();
        assert_eq!(report.output.state, SafetyState::Safe);
        assert!(bench.sent.borrow().is_empty());
    }

    #[test]
    fn test_input_fault_trips() {
        let bench = Bench::new();
        let mut station = bench.station(&DeviceConfig::default());

        bench.stop.set(None);
        let report = station.step();
        assert_eq!(report.fault, Some(InputFault::StopSwitch));
        assert_eq!(report.output.state, SafetyState::Unsafe);
        assert!(report.output.emit);
    }

    #[test]
    fn test_busy_transport_retries_next_interval() {
        let bench = Bench::new();
        let mut station = bench.station(&DeviceConfig::default());

        bench.stop.set(Some(false));
        bench.busy.set(true);
        let report = station.step();
        assert_eq!(report.key, Some(PulseEvent::PressDropped(KeyError::Busy)));

        bench.busy.set(false);
        for t in (10..5000).step_by(10) {
            bench.now.set(t);
            assert_eq!(station.step().key, None);
        }

        bench.now.set(5000);
        assert_eq!(station.step().key, Some(PulseEvent::Pressed));
    }
}
