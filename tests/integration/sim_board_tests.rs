//! The full lifecycle over the simulated board: real GPIO, piezo and
//! button drivers on in-memory pins.

use crate::mock_hw::RecordingSink;

use thermohat::adapters::sim_board::SimBoard;
use thermohat::app::indicator::LedColour;
use thermohat::app::lifecycle::{Job, Lifecycle, LifecycleState};
use thermohat::app::ports::SensorMode;
use thermohat::config::MonitorConfig;
use thermohat::drivers::piezo::PiezoState;

fn started(board: &mut SimBoard) -> (Lifecycle<SimBoard>, RecordingSink) {
    let mut lc = Lifecycle::new(MonitorConfig::default());
    let mut sink = RecordingSink::new();
    lc.startup(board, 0, &mut sink).unwrap();
    (lc, sink)
}

#[test]
fn startup_configures_sensor_and_display() {
    let mut board = SimBoard::with_profile(&[Some(25.0)]);
    let (lc, _) = started(&mut board);

    let hw = lc.peripherals();
    assert_eq!(hw.sensor().map(|s| s.mode()), Some(SensorMode::Normal));
    assert_eq!(hw.display().map(|d| d.is_enabled()), Some(true));
    assert_eq!(hw.display().map(|d| d.text()), Some(""));
    assert_eq!(hw.buzzer().map(|b| b.state()), Some(PiezoState::Silent));
}

#[test]
fn hot_reading_lights_red_and_sounds_the_piezo() {
    let mut board = SimBoard::with_profile(&[Some(30.0)]);
    let (mut lc, _) = started(&mut board);
    assert!(lc.poll(0, &mut RecordingSink::new()));

    let hw = lc.peripherals();
    assert_eq!(hw.display().map(|d| d.text()), Some("30.00"));
    assert_eq!(
        hw.buzzer().map(|b| b.state()),
        Some(PiezoState::Playing { hz: 2000 })
    );
    assert!(board.led_pin(LedColour::Red).is_set_high());
    assert!(!board.led_pin(LedColour::Green).is_set_high());
    assert!(!board.led_pin(LedColour::Blue).is_set_high());

    assert!(lc.poll(1800, &mut RecordingSink::new()));
    assert_eq!(
        lc.peripherals().buzzer().map(|b| b.state()),
        Some(PiezoState::Silent)
    );
}

#[test]
fn failed_read_blanks_the_indicators() {
    let mut board = SimBoard::with_profile(&[Some(18.0), None]);
    let (mut lc, mut sink) = started(&mut board);
    lc.poll(0, &mut sink);
    assert!(board.led_pin(LedColour::Blue).is_set_high());

    lc.poll(2000, &mut sink);
    assert_eq!(lc.peripherals().display().map(|d| d.text()), Some("--"));
    for colour in LedColour::ALL {
        assert!(!board.led_pin(colour).is_set_high());
    }
}

#[test]
fn shutdown_with_a_pending_silence_drops_every_job() {
    let mut board = SimBoard::with_profile(&[Some(35.0)]);
    let (mut lc, mut sink) = started(&mut board);
    lc.poll(0, &mut sink);
    assert!(lc.is_scheduled(Job::Tick));
    assert!(lc.is_scheduled(Job::SilenceBuzzer));

    lc.shutdown(&mut sink);
    assert_eq!(lc.state(), LifecycleState::Stopped);
    assert_eq!(lc.next_due_ms(), None);
    assert!(lc.peripherals().buzzer().is_none());
    assert!(lc.peripherals().display().is_none());
    assert!(!board.led_pin(LedColour::Red).is_set_high());
}

#[test]
fn button_c_press_stops_the_loop() {
    let mut board = SimBoard::with_profile(&[Some(25.0)]);
    let (mut lc, mut sink) = started(&mut board);
    assert!(lc.poll(0, &mut sink));

    board.button_pin().set_level(false);
    let still_running = lc.poll(10, &mut sink) && lc.poll(100, &mut sink);
    assert!(!still_running);
    lc.shutdown(&mut sink);
    assert_eq!(lc.peripherals().open_count(), 0);
}
