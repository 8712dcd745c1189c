//! Mock Rainbow HAT for integration tests.
//!
//! Every handle the [`MockBoard`] opens appends to one shared call log, so
//! tests can assert on ordering across peripherals (e.g. buzzer stop
//! before buzzer close).  Failures are injected per peripheral and
//! operation.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use thermohat::app::events::AppEvent;
use thermohat::app::indicator::LedColour;
use thermohat::app::ports::{
    Board, ButtonPort, BuzzerPort, Clock, DisplayPort, EventSink, LedPort, Oversampling,
    SensorMode, TemperaturePort,
};
use thermohat::error::{DeviceError, DeviceResult, Error, Peripheral};

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open(Peripheral),
    LedSet(LedColour, bool),
    LedClose(LedColour),
    SensorConfigure(Oversampling, SensorMode),
    SensorRead,
    SensorClose,
    DisplayBrightness(u8),
    DisplayEnable(bool),
    DisplayShow(String),
    DisplayClear,
    DisplayClose,
    BuzzerPlay(u32),
    BuzzerStop,
    BuzzerClose,
    ButtonClose,
}

// ── Shared state ──────────────────────────────────────────────

pub struct MockState {
    pub calls: Vec<Call>,
    /// What the next sensor read returns.
    pub reading: DeviceResult<f32>,
    /// Level of button C.
    pub pressed: bool,
    fail_open: Vec<Peripheral>,
    fail_ops: Vec<(Peripheral, &'static str)>,
}

pub type Shared = Rc<RefCell<MockState>>;

impl MockState {
    pub fn set_reading(&mut self, celsius: f32) {
        self.reading = Ok(celsius);
    }

    pub fn fail_reads(&mut self, fault: DeviceError) {
        self.reading = Err(fault);
    }

    pub fn fail_open(&mut self, peripheral: Peripheral) {
        self.fail_open.push(peripheral);
    }

    /// Make `operation` on `peripheral` fail with a bus error.
    pub fn fail_op(&mut self, peripheral: Peripheral, operation: &'static str) {
        self.fail_ops.push((peripheral, operation));
    }

    pub fn heal_op(&mut self, peripheral: Peripheral, operation: &'static str) {
        self.fail_ops.retain(|f| *f != (peripheral, operation));
    }

    /// LEDs whose last recorded write was "on".
    pub fn lit_leds(&self) -> Vec<LedColour> {
        LedColour::ALL
            .into_iter()
            .filter(|&colour| {
                self.calls
                    .iter()
                    .rev()
                    .find_map(|c| match c {
                        Call::LedSet(col, on) if *col == colour => Some(*on),
                        _ => None,
                    })
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Whether the last buzzer command was `play`.
    pub fn buzzer_sounding(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                Call::BuzzerPlay(_) => Some(true),
                Call::BuzzerStop => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn last_shown(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::DisplayShow(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn position(&self, call: &Call) -> Option<usize> {
        self.calls.iter().position(|c| c == call)
    }

    pub fn rposition(&self, call: &Call) -> Option<usize> {
        self.calls.iter().rposition(|c| c == call)
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn record(&mut self, call: Call, peripheral: Peripheral, operation: &'static str) -> DeviceResult<()> {
        self.calls.push(call);
        if self.fail_ops.contains(&(peripheral, operation)) {
            Err(DeviceError::Bus)
        } else {
            Ok(())
        }
    }
}

// ── Handles ───────────────────────────────────────────────────

pub struct MockLed(Shared, LedColour);

impl LedPort for MockLed {
    fn set(&mut self, on: bool) -> DeviceResult<()> {
        self.0
            .borrow_mut()
            .record(Call::LedSet(self.1, on), self.1.into(), "set")
    }

    fn close(&mut self) -> DeviceResult<()> {
        self.0
            .borrow_mut()
            .record(Call::LedClose(self.1), self.1.into(), "close")
    }
}

pub struct MockSensor(Shared);

impl TemperaturePort for MockSensor {
    fn configure(&mut self, oversampling: Oversampling, mode: SensorMode) -> DeviceResult<()> {
        self.0.borrow_mut().record(
            Call::SensorConfigure(oversampling, mode),
            Peripheral::Sensor,
            "configure",
        )
    }

    fn read_celsius(&mut self) -> DeviceResult<f32> {
        let mut state = self.0.borrow_mut();
        state.record(Call::SensorRead, Peripheral::Sensor, "read")?;
        state.reading
    }

    fn close(&mut self) -> DeviceResult<()> {
        self.0
            .borrow_mut()
            .record(Call::SensorClose, Peripheral::Sensor, "close")
    }
}

pub struct MockDisplay(Shared);

impl DisplayPort for MockDisplay {
    fn set_brightness(&mut self, level: u8) -> DeviceResult<()> {
        self.0.borrow_mut().record(
            Call::DisplayBrightness(level),
            Peripheral::Display,
            "brightness",
        )
    }

    fn set_enabled(&mut self, enabled: bool) -> DeviceResult<()> {
        self.0
            .borrow_mut()
            .record(Call::DisplayEnable(enabled), Peripheral::Display, "enable")
    }

    fn show(&mut self, text: &str) -> DeviceResult<()> {
        self.0
            .borrow_mut()
            .record(Call::DisplayShow(text.into()), Peripheral::Display, "show")
    }

    fn clear(&mut self) -> DeviceResult<()> {
        self.0
            .borrow_mut()
            .record(Call::DisplayClear, Peripheral::Display, "clear")
    }

    fn close(&mut self) -> DeviceResult<()> {
        self.0
            .borrow_mut()
            .record(Call::DisplayClose, Peripheral::Display, "close")
    }
}

pub struct MockBuzzer(Shared);

impl BuzzerPort for MockBuzzer {
    fn play(&mut self, frequency_hz: u32) -> DeviceResult<()> {
        self.0
            .borrow_mut()
            .record(Call::BuzzerPlay(frequency_hz), Peripheral::Buzzer, "play")
    }

    fn stop(&mut self) -> DeviceResult<()> {
        self.0
            .borrow_mut()
            .record(Call::BuzzerStop, Peripheral::Buzzer, "stop")
    }

    fn close(&mut self) -> DeviceResult<()> {
        self.0
            .borrow_mut()
            .record(Call::BuzzerClose, Peripheral::Buzzer, "close")
    }
}

pub struct MockButton(Shared);

impl ButtonPort for MockButton {
    fn is_pressed(&mut self) -> DeviceResult<bool> {
        Ok(self.0.borrow().pressed)
    }

    fn close(&mut self) -> DeviceResult<()> {
        self.0
            .borrow_mut()
            .record(Call::ButtonClose, Peripheral::Button, "close")
    }
}

// ── MockBoard ─────────────────────────────────────────────────

pub struct MockBoard {
    state: Shared,
}

impl MockBoard {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(MockState {
                calls: Vec::new(),
                reading: Ok(25.0),
                pressed: false,
                fail_open: Vec::new(),
                fail_ops: Vec::new(),
            })),
        }
    }

    /// Shared view of the call log and failure switches.
    pub fn state(&self) -> Shared {
        self.state.clone()
    }

    fn open<T>(&mut self, peripheral: Peripheral, handle: T) -> DeviceResult<T> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Open(peripheral));
        if state.fail_open.contains(&peripheral) {
            Err(DeviceError::Bus)
        } else {
            Ok(handle)
        }
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Board for MockBoard {
    type Led = MockLed;
    type Sensor = MockSensor;
    type Display = MockDisplay;
    type Buzzer = MockBuzzer;
    type Button = MockButton;

    fn open_led(&mut self, colour: LedColour) -> DeviceResult<MockLed> {
        let handle = MockLed(self.state.clone(), colour);
        self.open(colour.into(), handle)
    }

    fn open_sensor(&mut self) -> DeviceResult<MockSensor> {
        let handle = MockSensor(self.state.clone());
        self.open(Peripheral::Sensor, handle)
    }

    fn open_display(&mut self) -> DeviceResult<MockDisplay> {
        let handle = MockDisplay(self.state.clone());
        self.open(Peripheral::Display, handle)
    }

    fn open_buzzer(&mut self) -> DeviceResult<MockBuzzer> {
        let handle = MockBuzzer(self.state.clone());
        self.open(Peripheral::Buzzer, handle)
    }

    fn open_button(&mut self) -> DeviceResult<MockButton> {
        let handle = MockButton(self.state.clone());
        self.open(Peripheral::Button, handle)
    }
}

// ── Event recorder ────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn faults(&self) -> Vec<Error> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::PeripheralFault(err) => Some(*err),
                _ => None,
            })
            .collect()
    }

    pub fn tick_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Tick(_)))
            .count()
    }

    pub fn count(&self, event: &AppEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Scripted clock ────────────────────────────────────────────

/// Virtual clock that presses button C once `press_at_ms` is reached.
pub struct ScriptedClock {
    now: u64,
    press_at_ms: Option<u64>,
    state: Shared,
}

impl ScriptedClock {
    pub fn new(state: Shared, press_at_ms: Option<u64>) -> Self {
        Self {
            now: 0,
            press_at_ms,
            state,
        }
    }
}

impl Clock for ScriptedClock {
    fn now_ms(&self) -> u64 {
        self.now
    }

    fn sleep_ms(&mut self, ms: u64) {
        self.now += ms;
        if self.press_at_ms.is_some_and(|t| self.now >= t) {
            self.state.borrow_mut().pressed = true;
        }
    }
}
