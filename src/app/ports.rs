//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MonitorLoop / Lifecycle (domain)
//! ```
//!
//! Every peripheral on the Rainbow HAT is an opaque handle with explicit
//! open (via [`Board`]) and [`close`](LedPort::close) operations.  The
//! domain never touches GPIO, I²C or PWM directly.
//!
//! ## Contract
//!
//! - A handle must not be used after `close`; implementations return
//!   [`DeviceError::Closed`](crate::error::DeviceError::Closed) if it is.
//! - Every call is a single best-effort attempt.  The domain never retries;
//!   the next tick is the retry.

use crate::error::DeviceResult;

use super::events::AppEvent;
use super::indicator::LedColour;

// ───────────────────────────────────────────────────────────────
// Output ports (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// One binary LED output.
pub trait LedPort {
    fn set(&mut self, on: bool) -> DeviceResult<()>;
    fn close(&mut self) -> DeviceResult<()>;
}

/// Small alphanumeric segment display.
pub trait DisplayPort {
    /// Brightness level, 0 (dimmest) – 15 (brightest).
    fn set_brightness(&mut self, level: u8) -> DeviceResult<()>;

    /// The display must be enabled before text is visible.
    fn set_enabled(&mut self, enabled: bool) -> DeviceResult<()>;

    /// Render `text` (at most a handful of characters).
    fn show(&mut self, text: &str) -> DeviceResult<()>;

    /// Blank every segment.
    fn clear(&mut self) -> DeviceResult<()>;

    fn close(&mut self) -> DeviceResult<()>;
}

/// Piezo buzzer.  `play` returns immediately; the tone keeps sounding
/// until `stop`.
pub trait BuzzerPort {
    fn play(&mut self, frequency_hz: u32) -> DeviceResult<()>;
    fn stop(&mut self) -> DeviceResult<()>;
    fn close(&mut self) -> DeviceResult<()>;
}

// ───────────────────────────────────────────────────────────────
// Input ports (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Temperature oversampling setting (BMP280 `osrs_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Oversampling {
    Skipped,
    X1,
    X2,
    X4,
    X8,
    X16,
}

/// Sensor power mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorMode {
    Sleep,
    /// One measurement, then back to sleep.
    Forced,
    /// Continuous measurement cycling.
    Normal,
}

/// Temperature sensor.
pub trait TemperaturePort {
    fn configure(&mut self, oversampling: Oversampling, mode: SensorMode) -> DeviceResult<()>;

    /// Latest temperature in °C.  Fails with
    /// [`DeviceError::InvalidState`](crate::error::DeviceError::InvalidState)
    /// when the sensor is not measuring.
    fn read_celsius(&mut self) -> DeviceResult<f32>;

    fn close(&mut self) -> DeviceResult<()>;
}

/// Momentary push-button, sampled as a level.
///
/// Edge detection and debouncing live in
/// [`ButtonDriver`](crate::drivers::button::ButtonDriver).
pub trait ButtonPort {
    fn is_pressed(&mut self) -> DeviceResult<bool>;
    fn close(&mut self) -> DeviceResult<()>;
}

// ───────────────────────────────────────────────────────────────
// Board (peripheral factory)
// ───────────────────────────────────────────────────────────────

/// Opens the peripheral handles of one board.
///
/// Each `open_*` is independent: a failure to open one peripheral must not
/// affect the others.
pub trait Board {
    type Led: LedPort;
    type Sensor: TemperaturePort;
    type Display: DisplayPort;
    type Buzzer: BuzzerPort;
    type Button: ButtonPort;

    fn open_led(&mut self, colour: LedColour) -> DeviceResult<Self::Led>;
    fn open_sensor(&mut self) -> DeviceResult<Self::Sensor>;
    fn open_display(&mut self) -> DeviceResult<Self::Display>;
    fn open_buzzer(&mut self) -> DeviceResult<Self::Buzzer>;
    fn open_button(&mut self) -> DeviceResult<Self::Button>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.  Adapters
/// decide where they go (serial log, test recorder, …).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock the lifecycle loop sleeps on.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> u64;

    /// Suspend the loop.  Nothing else runs on the loop thread meanwhile.
    fn sleep_ms(&mut self, ms: u64);
}
