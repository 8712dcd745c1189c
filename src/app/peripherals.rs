//! The owning peripheral context.
//!
//! [`Peripherals`] replaces process-wide device globals: every handle lives
//! in an `Option` slot owned by the [`Lifecycle`](super::lifecycle::Lifecycle).
//! `None` means "never opened" or "already closed"; closing takes the
//! handle out of its slot, so a handle can be neither used nor closed twice.
//!
//! Every failure is logged, emitted as [`AppEvent::PeripheralFault`], and
//! absorbed here.  Nothing in this module returns an error to its caller.

use log::{info, warn};

use crate::config::MonitorConfig;
use crate::drivers::button::ButtonDriver;
use crate::error::{DeviceError, DeviceResult, Error, Peripheral};

use super::events::AppEvent;
use super::indicator::LedColour;
use super::ports::{
    Board, BuzzerPort, DisplayPort, EventSink, LedPort, Oversampling, SensorMode,
    TemperaturePort,
};

/// Total number of peripheral handles.
pub const PERIPHERAL_COUNT: u8 = 7;

/// Log and emit an absorbed fault.
pub(crate) fn absorb(sink: &mut impl EventSink, error: Error) {
    warn!("{}", error);
    sink.emit(&AppEvent::PeripheralFault(error));
}

/// Outcome of [`Peripherals::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenSummary {
    pub opened: u8,
    pub failed: u8,
}

pub struct Peripherals<B: Board> {
    leds: [Option<B::Led>; 3],
    sensor: Option<B::Sensor>,
    display: Option<B::Display>,
    buzzer: Option<B::Buzzer>,
    button: Option<ButtonDriver<B::Button>>,
    /// True while the buzzer is (believed to be) sounding.
    buzzer_active: bool,
}

impl<B: Board> Default for Peripherals<B> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<B: Board> Peripherals<B> {
    /// A context with no open handles.
    pub fn empty() -> Self {
        Self {
            leds: [None, None, None],
            sensor: None,
            display: None,
            buzzer: None,
            button: None,
            buzzer_active: false,
        }
    }

    // ── Open ──────────────────────────────────────────────────

    /// Open every peripheral in startup order.  Each failure is absorbed
    /// independently; whatever opened stays usable.
    ///
    /// The button is opened without a listener; the caller registers one
    /// through [`button_mut`](Self::button_mut).
    pub fn open(
        board: &mut B,
        config: &MonitorConfig,
        sink: &mut impl EventSink,
    ) -> (Self, OpenSummary) {
        let mut hw = Self::empty();
        let mut summary = OpenSummary::default();
        let mut tally = |ok: bool| {
            if ok {
                summary.opened += 1;
            } else {
                summary.failed += 1;
            }
        };

        // 1. LEDs, initialised off.
        for colour in LedColour::ALL {
            let peripheral = Peripheral::from(colour);
            match board.open_led(colour) {
                Ok(mut led) => {
                    if let Err(e) = led.set(false) {
                        absorb(sink, Error::io(peripheral, "set", e));
                    }
                    hw.leds[colour.index()] = Some(led);
                    tally(true);
                }
                Err(e) => {
                    absorb(sink, Error::open(peripheral, e));
                    tally(false);
                }
            }
        }

        // 2. Sensor: temperature oversampling x1, continuous measurement.
        hw.sensor = open_configured(
            sink,
            Peripheral::Sensor,
            board.open_sensor(),
            |s| s.configure(Oversampling::X1, SensorMode::Normal),
            |s| s.close(),
        );
        tally(hw.sensor.is_some());

        // 3. Display: brightness, then enable.
        let brightness = config.display_brightness;
        hw.display = open_configured(
            sink,
            Peripheral::Display,
            board.open_display(),
            |d| {
                d.set_brightness(brightness)?;
                d.set_enabled(true)
            },
            |d| d.close(),
        );
        tally(hw.display.is_some());

        // 4. Buzzer.
        match board.open_buzzer() {
            Ok(buzzer) => hw.buzzer = Some(buzzer),
            Err(e) => absorb(sink, Error::open(Peripheral::Buzzer, e)),
        }
        tally(hw.buzzer.is_some());

        // 5. Button.
        match board.open_button() {
            Ok(port) => {
                hw.button = Some(ButtonDriver::new(port, u64::from(config.button_debounce_ms)));
            }
            Err(e) => absorb(sink, Error::open(Peripheral::Button, e)),
        }
        tally(hw.button.is_some());

        info!(
            "peripherals: {} opened, {} failed",
            summary.opened, summary.failed
        );
        (hw, summary)
    }

    // ── Close ─────────────────────────────────────────────────

    /// Release every open handle in the fixed shutdown order.  Returns the
    /// number of absorbed failures.  A second call finds every slot empty
    /// and does nothing.
    pub fn close_all(&mut self, sink: &mut impl EventSink) -> u8 {
        let mut failures = 0u8;

        // 1. Button: no more shutdown requests from here on.
        if let Some(mut button) = self.button.take() {
            failures += settle(sink, button.close(), |e| Error::close(Peripheral::Button, e));
        }

        // 2. LEDs: all off first, then release.
        for colour in LedColour::ALL {
            if let Some(led) = self.leds[colour.index()].as_mut() {
                let p = Peripheral::from(colour);
                failures += settle(sink, led.set(false), |e| Error::io(p, "set", e));
            }
        }
        for colour in LedColour::ALL {
            if let Some(mut led) = self.leds[colour.index()].take() {
                let p = Peripheral::from(colour);
                failures += settle(sink, led.close(), |e| Error::close(p, e));
            }
        }

        // 3. Sensor.
        if let Some(mut sensor) = self.sensor.take() {
            failures += settle(sink, sensor.close(), |e| Error::close(Peripheral::Sensor, e));
        }

        // 4. Display: clear, disable, release.
        if let Some(mut display) = self.display.take() {
            failures += settle(sink, display.clear(), |e| {
                Error::io(Peripheral::Display, "clear", e)
            });
            failures += settle(sink, display.set_enabled(false), |e| {
                Error::io(Peripheral::Display, "disable", e)
            });
            failures += settle(sink, display.close(), |e| Error::close(Peripheral::Display, e));
        }

        // 5. Buzzer: silence first, then release.
        if let Some(mut buzzer) = self.buzzer.take() {
            if self.buzzer_active {
                failures += settle(sink, buzzer.stop(), |e| {
                    Error::io(Peripheral::Buzzer, "stop", e)
                });
                self.buzzer_active = false;
            }
            failures += settle(sink, buzzer.close(), |e| Error::close(Peripheral::Buzzer, e));
        }

        failures
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn led_mut(&mut self, colour: LedColour) -> Option<&mut B::Led> {
        self.leds[colour.index()].as_mut()
    }

    pub fn sensor_mut(&mut self) -> Option<&mut B::Sensor> {
        self.sensor.as_mut()
    }

    pub fn display_mut(&mut self) -> Option<&mut B::Display> {
        self.display.as_mut()
    }

    pub fn buzzer_mut(&mut self) -> Option<&mut B::Buzzer> {
        self.buzzer.as_mut()
    }

    pub fn button_mut(&mut self) -> Option<&mut ButtonDriver<B::Button>> {
        self.button.as_mut()
    }

    pub fn sensor(&self) -> Option<&B::Sensor> {
        self.sensor.as_ref()
    }

    pub fn display(&self) -> Option<&B::Display> {
        self.display.as_ref()
    }

    pub fn buzzer(&self) -> Option<&B::Buzzer> {
        self.buzzer.as_ref()
    }

    pub fn buzzer_active(&self) -> bool {
        self.buzzer_active
    }

    pub(crate) fn set_buzzer_active(&mut self, active: bool) {
        self.buzzer_active = active;
    }

    /// Number of handles still open.
    pub fn open_count(&self) -> u8 {
        let leds = self.leds.iter().filter(|l| l.is_some()).count() as u8;
        leds + u8::from(self.sensor.is_some())
            + u8::from(self.display.is_some())
            + u8::from(self.buzzer.is_some())
            + u8::from(self.button.is_some())
    }
}

/// Open a handle and run its initial configuration.  A configuration
/// failure counts as an open failure: the handle is closed best-effort
/// and the slot stays empty.
fn open_configured<T>(
    sink: &mut impl EventSink,
    peripheral: Peripheral,
    opened: DeviceResult<T>,
    configure: impl FnOnce(&mut T) -> DeviceResult<()>,
    close: impl FnOnce(&mut T) -> DeviceResult<()>,
) -> Option<T> {
    let mut handle = match opened {
        Ok(h) => h,
        Err(e) => {
            absorb(sink, Error::open(peripheral, e));
            return None;
        }
    };
    match configure(&mut handle) {
        Ok(()) => Some(handle),
        Err(e) => {
            absorb(sink, Error::open(peripheral, e));
            if let Err(e) = close(&mut handle) {
                absorb(sink, Error::close(peripheral, e));
            }
            None
        }
    }
}

/// Absorb one close-path result; returns 1 on failure.
pub(crate) fn settle(
    sink: &mut impl EventSink,
    result: DeviceResult<()>,
    error: impl FnOnce(DeviceError) -> Error,
) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            absorb(sink, error(e));
            1
        }
    }
}
