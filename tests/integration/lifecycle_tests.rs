//! Startup, button-driven shutdown and the run loop against the mock
//! board.

use crate::mock_hw::{Call, MockBoard, RecordingSink, ScriptedClock, Shared};

use thermohat::app::events::AppEvent;
use thermohat::app::indicator::LedColour;
use thermohat::app::lifecycle::{Job, Lifecycle, LifecycleState};
use thermohat::app::ports::{Oversampling, SensorMode};
use thermohat::config::MonitorConfig;
use thermohat::error::{DeviceError, Error, Peripheral};

fn started(board: &mut MockBoard) -> (Lifecycle<MockBoard>, RecordingSink) {
    let mut lc = Lifecycle::new(MonitorConfig::default());
    let mut sink = RecordingSink::new();
    lc.startup(board, 0, &mut sink).unwrap();
    (lc, sink)
}

fn press(state: &Shared, lc: &mut Lifecycle<MockBoard>, sink: &mut RecordingSink, at_ms: u64) -> bool {
    state.borrow_mut().pressed = true;
    lc.poll(at_ms, sink) && lc.poll(at_ms + 50, sink)
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn startup_opens_in_order_and_configures() {
    let mut board = MockBoard::new();
    let state = board.state();
    let (lc, sink) = started(&mut board);

    let s = state.borrow();
    assert_eq!(
        s.calls,
        vec![
            Call::Open(Peripheral::LedRed),
            Call::LedSet(LedColour::Red, false),
            Call::Open(Peripheral::LedGreen),
            Call::LedSet(LedColour::Green, false),
            Call::Open(Peripheral::LedBlue),
            Call::LedSet(LedColour::Blue, false),
            Call::Open(Peripheral::Sensor),
            Call::SensorConfigure(Oversampling::X1, SensorMode::Normal),
            Call::Open(Peripheral::Display),
            Call::DisplayBrightness(15),
            Call::DisplayEnable(true),
            Call::Open(Peripheral::Buzzer),
            Call::Open(Peripheral::Button),
        ]
    );
    assert_eq!(lc.state(), LifecycleState::Running);
    assert!(lc.is_scheduled(Job::Tick));
    assert_eq!(lc.next_due_ms(), Some(0));
    assert_eq!(sink.events, vec![AppEvent::Started { opened: 7, failed: 0 }]);
}

#[test]
fn open_failure_only_disables_that_peripheral() {
    let mut board = MockBoard::new();
    let state = board.state();
    state.borrow_mut().fail_open(Peripheral::Display);
    let (mut lc, sink) = started(&mut board);

    assert_eq!(sink.faults(), vec![Error::open(Peripheral::Display, DeviceError::Bus)]);
    assert_eq!(lc.peripherals().open_count(), 6);

    let mut sink = RecordingSink::new();
    state.borrow_mut().set_reading(21.0);
    lc.poll(0, &mut sink);
    assert_eq!(state.borrow().lit_leds(), vec![LedColour::Blue]);
    assert_eq!(state.borrow().last_shown(), None);
}

#[test]
fn failed_sensor_configure_closes_the_handle() {
    let mut board = MockBoard::new();
    let state = board.state();
    state.borrow_mut().fail_op(Peripheral::Sensor, "configure");
    let (lc, sink) = started(&mut board);

    assert_eq!(
        sink.faults(),
        vec![Error::open(Peripheral::Sensor, DeviceError::Bus)]
    );
    assert_eq!(state.borrow().count(&Call::SensorClose), 1);
    assert_eq!(lc.peripherals().open_count(), 6);
}

// ── Scheduling ────────────────────────────────────────────────

#[test]
fn failed_read_is_still_rescheduled() {
    let mut board = MockBoard::new();
    let state = board.state();
    state.borrow_mut().fail_reads(DeviceError::Bus);
    let (mut lc, mut sink) = started(&mut board);

    assert!(lc.poll(0, &mut sink));
    assert_eq!(state.borrow().last_shown(), Some("--"));
    assert_eq!(lc.next_due_ms(), Some(2000));
    assert!(lc.poll(2000, &mut sink));
    assert_eq!(sink.tick_count(), 2);
}

#[test]
fn tone_silenced_before_next_tick() {
    let mut board = MockBoard::new();
    let state = board.state();
    state.borrow_mut().set_reading(30.0);
    let (mut lc, mut sink) = started(&mut board);

    lc.poll(0, &mut sink);
    assert!(state.borrow().buzzer_sounding());
    lc.poll(1799, &mut sink);
    assert!(state.borrow().buzzer_sounding());
    lc.poll(1800, &mut sink);
    assert!(!state.borrow().buzzer_sounding());
    assert_eq!(sink.count(&AppEvent::BuzzerSilenced), 1);
}

// ── Shutdown ──────────────────────────────────────────────────

#[test]
fn button_press_during_hot_stops_buzzer_before_close() {
    let mut board = MockBoard::new();
    let state = board.state();
    state.borrow_mut().set_reading(30.0);
    let (mut lc, mut sink) = started(&mut board);

    lc.poll(0, &mut sink);
    assert!(lc.peripherals().buzzer_active());
    assert!(!press(&state, &mut lc, &mut sink, 500));
    assert_eq!(sink.count(&AppEvent::ShutdownRequested), 1);

    lc.shutdown(&mut sink);
    let s = state.borrow();
    let stop = s.rposition(&Call::BuzzerStop).unwrap();
    let close = s.position(&Call::BuzzerClose).unwrap();
    assert!(stop < close);
    assert!(s.rposition(&Call::BuzzerPlay(2000)).unwrap() < stop);
}

#[test]
fn shutdown_closes_in_order() {
    let mut board = MockBoard::new();
    let state = board.state();
    let (mut lc, mut sink) = started(&mut board);
    lc.poll(0, &mut sink);
    state.borrow_mut().clear_calls();

    lc.shutdown(&mut sink);

    let s = state.borrow();
    assert_eq!(
        s.calls,
        vec![
            Call::ButtonClose,
            Call::LedSet(LedColour::Red, false),
            Call::LedSet(LedColour::Green, false),
            Call::LedSet(LedColour::Blue, false),
            Call::LedClose(LedColour::Red),
            Call::LedClose(LedColour::Green),
            Call::LedClose(LedColour::Blue),
            Call::SensorClose,
            Call::DisplayClear,
            Call::DisplayEnable(false),
            Call::DisplayClose,
            Call::BuzzerClose,
        ]
    );
    assert_eq!(lc.state(), LifecycleState::Stopped);
    assert_eq!(sink.events.last(), Some(&AppEvent::Stopped { close_failures: 0 }));
}

#[test]
fn shutdown_twice_is_a_noop() {
    let mut board = MockBoard::new();
    let state = board.state();
    let (mut lc, mut sink) = started(&mut board);
    lc.poll(0, &mut sink);

    lc.shutdown(&mut sink);
    let calls_after_first = state.borrow().calls.len();
    let events_after_first = sink.events.len();
    lc.shutdown(&mut sink);

    assert_eq!(state.borrow().calls.len(), calls_after_first);
    assert_eq!(sink.events.len(), events_after_first);
    for colour in LedColour::ALL {
        assert_eq!(state.borrow().count(&Call::LedClose(colour)), 1);
    }
    assert_eq!(state.borrow().count(&Call::SensorClose), 1);
}

#[test]
fn close_failures_do_not_block_later_closes() {
    let mut board = MockBoard::new();
    let state = board.state();
    let (mut lc, mut sink) = started(&mut board);
    state.borrow_mut().fail_op(Peripheral::LedRed, "close");
    state.borrow_mut().fail_op(Peripheral::Sensor, "close");

    lc.shutdown(&mut sink);

    let s = state.borrow();
    assert_eq!(s.count(&Call::DisplayClose), 1);
    assert_eq!(s.count(&Call::BuzzerClose), 1);
    assert_eq!(sink.events.last(), Some(&AppEvent::Stopped { close_failures: 2 }));
    assert!(sink.faults().contains(&Error::close(Peripheral::Sensor, DeviceError::Bus)));
}

#[test]
fn no_tick_after_shutdown_request() {
    let mut board = MockBoard::new();
    let state = board.state();
    let (mut lc, mut sink) = started(&mut board);
    lc.poll(0, &mut sink);
    lc.shutdown_signal().request();

    assert!(!lc.poll(2000, &mut sink));
    assert_eq!(sink.tick_count(), 1);
    assert_eq!(state.borrow().count(&Call::SensorRead), 1);
}

// ── Run loop ──────────────────────────────────────────────────

#[test]
fn run_ticks_until_button_then_shuts_down() {
    let mut board = MockBoard::new();
    let state = board.state();
    let (mut lc, mut sink) = started(&mut board);
    let mut clock = ScriptedClock::new(state.clone(), Some(5000));

    lc.run(&mut clock, &mut sink);

    assert_eq!(sink.tick_count(), 3, "ticks at 0, 2000 and 4000 ms");
    assert_eq!(lc.state(), LifecycleState::Stopped);
    assert_eq!(lc.peripherals().open_count(), 0);
    assert_eq!(state.borrow().count(&Call::ButtonClose), 1);
}
