//! Unified error types for the ThermoHat application.
//!
//! Two layers:
//!
//! - [`DeviceError`] is what a port implementation reports.  It knows
//!   nothing about which peripheral it belongs to.
//! - [`Error`] is what the application core logs and emits.  It wraps a
//!   `DeviceError` with the peripheral identity and the lifecycle phase
//!   (open, I/O, close) in which it happened.
//!
//! All variants are `Copy` so they can be emitted through the event sink
//! and stored in tick reports without allocation.  None of them is ever
//! propagated out of the control loop: every fault is logged and absorbed
//! at the point of the operation.

use core::fmt;

use crate::app::indicator::LedColour;

// ---------------------------------------------------------------------------
// Peripheral identity
// ---------------------------------------------------------------------------

/// Every peripheral the application opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Peripheral {
    LedRed,
    LedGreen,
    LedBlue,
    Sensor,
    Display,
    Buzzer,
    Button,
}

impl Peripheral {
    /// Short lowercase name used in log lines.
    pub const fn name(self) -> &'static str {
        match self {
            Self::LedRed => "led-red",
            Self::LedGreen => "led-green",
            Self::LedBlue => "led-blue",
            Self::Sensor => "sensor",
            Self::Display => "display",
            Self::Buzzer => "buzzer",
            Self::Button => "button",
        }
    }
}

impl From<LedColour> for Peripheral {
    fn from(colour: LedColour) -> Self {
        match colour {
            LedColour::Red => Self::LedRed,
            LedColour::Green => Self::LedGreen,
            LedColour::Blue => Self::LedBlue,
        }
    }
}

impl fmt::Display for Peripheral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Device errors (port level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// The underlying bus / GPIO / PWM transaction failed.
    Bus,
    /// The device is not in a state that allows the operation
    /// (e.g. sensor read before it was configured).
    InvalidState,
    /// The device answered, but with data that cannot be a measurement.
    InvalidData,
    /// The handle was already closed.
    Closed,
    /// The device does not support the requested setting.
    Unsupported,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "bus error"),
            Self::InvalidState => write!(f, "invalid device state"),
            Self::InvalidData => write!(f, "invalid data"),
            Self::Closed => write!(f, "handle closed"),
            Self::Unsupported => write!(f, "unsupported setting"),
        }
    }
}

impl std::error::Error for DeviceError {}

// ---------------------------------------------------------------------------
// Application error (peripheral + phase + fault)
// ---------------------------------------------------------------------------

/// Every absorbed peripheral failure funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Opening (or initially configuring) a peripheral failed.
    Open {
        peripheral: Peripheral,
        fault: DeviceError,
    },
    /// A read or write on an open peripheral failed.
    Io {
        peripheral: Peripheral,
        operation: &'static str,
        fault: DeviceError,
    },
    /// Releasing a peripheral failed.
    Close {
        peripheral: Peripheral,
        fault: DeviceError,
    },
}

impl Error {
    pub const fn open(peripheral: Peripheral, fault: DeviceError) -> Self {
        Self::Open { peripheral, fault }
    }

    pub const fn io(peripheral: Peripheral, operation: &'static str, fault: DeviceError) -> Self {
        Self::Io {
            peripheral,
            operation,
            fault,
        }
    }

    pub const fn close(peripheral: Peripheral, fault: DeviceError) -> Self {
        Self::Close { peripheral, fault }
    }

    /// The peripheral this error belongs to.
    pub const fn peripheral(&self) -> Peripheral {
        match self {
            Self::Open { peripheral, .. }
            | Self::Io { peripheral, .. }
            | Self::Close { peripheral, .. } => *peripheral,
        }
    }

    /// The underlying device fault.
    pub const fn fault(&self) -> DeviceError {
        match self {
            Self::Open { fault, .. } | Self::Io { fault, .. } | Self::Close { fault, .. } => *fault,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { peripheral, fault } => write!(f, "open {peripheral}: {fault}"),
            Self::Io {
                peripheral,
                operation,
                fault,
            } => write!(f, "{peripheral} {operation}: {fault}"),
            Self::Close { peripheral, fault } => write!(f, "close {peripheral}: {fault}"),
        }
    }
}

impl std::error::Error for Error {}

/// Port-level `Result` alias.
pub type DeviceResult<T> = core::result::Result<T, DeviceError>;
