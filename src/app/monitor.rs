//! The periodic sense → classify → actuate cycle.
//!
//! [`MonitorLoop::tick`] runs one cycle against a borrowed
//! [`Peripherals`] context.  It never closes a handle and never fails:
//! every fault is absorbed and the worst outcome is the `Unknown` state.
//!
//! ```text
//!   stop tone ─▶ read ─▶ round ─▶ classify ─▶ LEDs ─▶ buzzer ─▶ display
//! ```
//!
//! Rescheduling is the [`Lifecycle`](super::lifecycle::Lifecycle)'s job.

use log::{debug, info};

use crate::config::MonitorConfig;
use crate::error::{DeviceError, Error, Peripheral};

use super::events::{AppEvent, TickReport};
use super::indicator::{self, Indicator, LedColour, Temperature, Thresholds};
use super::peripherals::{Peripherals, absorb, settle};
use super::ports::{Board, BuzzerPort, DisplayPort, EventSink, LedPort, TemperaturePort};

pub struct MonitorLoop {
    thresholds: Thresholds,
    buzzer_hz: u32,
    indicator: Indicator,
    ticks: u64,
}

impl MonitorLoop {
    pub fn new(thresholds: Thresholds, buzzer_hz: u32) -> Self {
        Self {
            thresholds,
            buzzer_hz,
            indicator: Indicator::Unknown,
            ticks: 0,
        }
    }

    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(config.thresholds(), config.buzzer_frequency_hz)
    }

    /// Current indicator state (`Unknown` before the first tick).
    pub fn indicator(&self) -> Indicator {
        self.indicator
    }

    /// Ticks completed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick<B: Board>(
        &mut self,
        hw: &mut Peripherals<B>,
        sink: &mut impl EventSink,
    ) -> TickReport {
        self.ticks += 1;
        let mut faults = 0u8;

        // 1. End the previous tone.  On failure the flag stays set.
        if hw.buzzer_active() {
            faults += stop_buzzer(hw, sink);
        }

        // 2-3. Read and round.
        let (temperature, read_faults) = read_temperature(hw, sink);
        faults += read_faults;
        match temperature {
            Some(t) => debug!("tick {}: {}", self.ticks, t),
            None => debug!("tick {}: no reading", self.ticks),
        }

        // 4. Classify.
        let next = self.thresholds.classify(temperature);
        if next != self.indicator {
            info!("indicator: {} -> {}", self.indicator, next);
            sink.emit(&AppEvent::IndicatorChanged {
                from: self.indicator,
                to: next,
            });
            self.indicator = next;
        }

        // 5. LEDs: everything else off before the target goes on.
        let target = next.led();
        for colour in LedColour::ALL {
            if Some(colour) == target {
                continue;
            }
            if let Some(led) = hw.led_mut(colour) {
                let p = Peripheral::from(colour);
                faults += settle(sink, led.set(false), |e| Error::io(p, "set", e));
            }
        }
        if let Some(colour) = target {
            if let Some(led) = hw.led_mut(colour) {
                let p = Peripheral::from(colour);
                faults += settle(sink, led.set(true), |e| Error::io(p, "set", e));
            }
        }

        // 6. Alarm.
        if next.alarms() {
            let hz = self.buzzer_hz;
            if let Some(buzzer) = hw.buzzer_mut() {
                match buzzer.play(hz) {
                    Ok(()) => hw.set_buzzer_active(true),
                    Err(e) => {
                        absorb(sink, Error::io(Peripheral::Buzzer, "play", e));
                        faults += 1;
                    }
                }
            }
        }

        // 7. Display.
        let display_text = indicator::display_text(temperature);
        let mut display_updated = false;
        if let Some(display) = hw.display_mut() {
            match display.show(&display_text) {
                Ok(()) => display_updated = true,
                Err(e) => {
                    absorb(sink, Error::io(Peripheral::Display, "show", e));
                    faults += 1;
                }
            }
        }

        let report = TickReport {
            tick: self.ticks,
            temperature,
            indicator: next,
            display_text,
            display_updated,
            buzzer_active: hw.buzzer_active(),
            faults,
        };
        sink.emit(&AppEvent::Tick(report.clone()));
        report
    }

    /// End a tone before the next tick.  Returns `true` if the buzzer was
    /// sounding and is now silent.
    pub fn silence_buzzer<B: Board>(
        &mut self,
        hw: &mut Peripherals<B>,
        sink: &mut impl EventSink,
    ) -> bool {
        if !hw.buzzer_active() {
            return false;
        }
        if stop_buzzer(hw, sink) == 0 {
            sink.emit(&AppEvent::BuzzerSilenced);
            true
        } else {
            false
        }
    }
}

/// Stop the buzzer and clear the activity flag on success.  Returns the
/// number of faults (0 or 1).
fn stop_buzzer<B: Board>(hw: &mut Peripherals<B>, sink: &mut impl EventSink) -> u8 {
    let Some(buzzer) = hw.buzzer_mut() else {
        hw.set_buzzer_active(false);
        return 0;
    };
    let failed = settle(sink, buzzer.stop(), |e| Error::io(Peripheral::Buzzer, "stop", e));
    if failed == 0 {
        hw.set_buzzer_active(false);
    }
    failed
}

/// Sample the sensor.  Any failure, a missing sensor, or a non-finite
/// value gives `None`.
fn read_temperature<B: Board>(
    hw: &mut Peripherals<B>,
    sink: &mut impl EventSink,
) -> (Option<Temperature>, u8) {
    let Some(sensor) = hw.sensor_mut() else {
        return (None, 0);
    };
    match sensor.read_celsius() {
        Ok(raw) => match Temperature::from_raw(raw) {
            Some(t) => (Some(t), 0),
            None => {
                absorb(
                    sink,
                    Error::io(Peripheral::Sensor, "read", DeviceError::InvalidData),
                );
                (None, 1)
            }
        },
        Err(e) => {
            absorb(sink, Error::io(Peripheral::Sensor, "read", e));
            (None, 1)
        }
    }
}
