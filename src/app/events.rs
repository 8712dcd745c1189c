//! Outbound application events.
//!
//! The [`MonitorLoop`](super::monitor::MonitorLoop) and
//! [`Lifecycle`](super::lifecycle::Lifecycle) emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::error::Error;

use super::indicator::{DisplayText, Indicator, Temperature};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Startup finished; `opened` of the 7 peripherals are usable.
    Started { opened: u8, failed: u8 },

    /// One monitor tick completed.
    Tick(TickReport),

    /// The indicator moved between states.
    IndicatorChanged { from: Indicator, to: Indicator },

    /// A peripheral operation failed and was absorbed.
    PeripheralFault(Error),

    /// The buzzer tone ended before the next tick.
    BuzzerSilenced,

    /// Shutdown was requested (button press or external signal).
    ShutdownRequested,

    /// Shutdown finished; every peripheral handle has been released.
    Stopped { close_failures: u8 },
}

/// What one tick observed and did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// 1-based tick number.
    pub tick: u64,
    /// Rounded reading, `None` if undefined.
    pub temperature: Option<Temperature>,
    pub indicator: Indicator,
    /// Text sent to the display.
    pub display_text: DisplayText,
    /// Whether the display accepted the text.
    pub display_updated: bool,
    /// Buzzer activity flag after the tick.
    pub buzzer_active: bool,
    /// Peripheral faults absorbed during the tick.
    pub faults: u8,
}
