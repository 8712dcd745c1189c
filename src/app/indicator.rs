//! Temperature classification: the pure heart of the monitor.
//!
//! ```text
//!            low_c              high_c
//!   ──────────┼───────────────────┼──────────▶ °C
//!     Cold    │      Normal       │    Hot
//!   (blue)    │     (green)       │  (red + buzzer)
//! ```
//!
//! A failed read never falls into `Cold`: it is `None` and classifies as
//! [`Indicator::Unknown`] (all LEDs off, buzzer silent, display `--`).

use core::fmt::{self, Write as _};

use heapless::String;
use log::warn;

/// Placeholder rendered when there is no valid reading.
pub const PLACEHOLDER: &str = "--";

/// Decimal places kept after rounding.
pub const DECIMAL_PLACES: u32 = 2;

/// Bytes the segment display accepts: four digits plus sign and point.
pub const DISPLAY_TEXT_MAX: usize = 8;

/// Text shown on the segment display.  Readings that do not fit render as
/// [`PLACEHOLDER`].
pub type DisplayText = String<DISPLAY_TEXT_MAX>;

const _: () = assert!(PLACEHOLDER.len() <= DISPLAY_TEXT_MAX);

/// Scratch space for a float's plain decimal rendering.  Every finite
/// `f32` fits; `f64` values far outside the sensor range may not.
type DecimalText = String<64>;

/// Round to `places` decimals, ties away from zero.
///
/// The tie is decided on the shortest decimal rendering of `value`, the
/// way a decimal library would round the literal: 37.005 becomes 37.01
/// and 0.004999999 becomes 0.00.
pub fn round_half_up(value: f64, places: u32) -> f64 {
    let mut text = DecimalText::new();
    if write!(text, "{}", value).is_err() {
        // Magnitude too large or too small for a fractional tie to matter.
        let factor = 10f64.powi(places as i32);
        return normalise_zero((value * factor).round() / factor);
    }
    round_decimal_text(&text, places).unwrap_or(value)
}

/// Round the plain decimal text of a number (`-12.3456`, no exponent).
fn round_decimal_text(text: &str, places: u32) -> Option<f64> {
    let (negative, magnitude) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (int_part, frac_part) = magnitude.split_once('.').unwrap_or((magnitude, ""));

    // Integer count of 10^-places units, truncated.
    let mut units = DecimalText::new();
    units.push_str(int_part).ok()?;
    let mut frac = frac_part.bytes();
    for _ in 0..places {
        units.push(char::from(frac.next().unwrap_or(b'0'))).ok()?;
    }
    let mut scaled: f64 = units.parse().ok()?;
    if frac.next().is_some_and(|d| d >= b'5') {
        scaled += 1.0;
    }

    let rounded = scaled / 10f64.powi(places as i32);
    Some(normalise_zero(if negative { -rounded } else { rounded }))
}

/// Never render "-0.00".
fn normalise_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

// ---------------------------------------------------------------------------
// Temperature
// ---------------------------------------------------------------------------

/// A valid sensor reading in °C, already rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Temperature(f32);

impl Temperature {
    /// Round a raw reading.  Returns `None` for NaN / infinite values,
    /// which no real sensor can produce.
    pub fn from_raw(celsius: f32) -> Option<Self> {
        if !celsius.is_finite() {
            return None;
        }
        let mut text = DecimalText::new();
        write!(text, "{}", celsius).ok()?;
        let rounded = round_decimal_text(&text, DECIMAL_PLACES)?;
        Some(Self(rounded as f32))
    }

    pub fn celsius(self) -> f32 {
        self.0
    }

    /// Two-decimal rendering for the segment display, or [`PLACEHOLDER`]
    /// when the reading is too wide to show.
    pub fn display_text(self) -> DisplayText {
        let mut text = DisplayText::new();
        if write!(text, "{:.2}", self.0).is_err() {
            warn!("{} does not fit the display", self);
            return placeholder();
        }
        text
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}\u{00b0}C", self.0)
    }
}

/// Display text for a possibly undefined reading.
pub fn display_text(reading: Option<Temperature>) -> DisplayText {
    match reading {
        Some(t) => t.display_text(),
        None => placeholder(),
    }
}

fn placeholder() -> DisplayText {
    let mut text = DisplayText::new();
    // Cannot fail: the length is asserted against the capacity above.
    let _ = text.push_str(PLACEHOLDER);
    text
}

// ---------------------------------------------------------------------------
// Thresholds & indicator
// ---------------------------------------------------------------------------

/// The two fixed boundaries.  `Normal` is `[low_c, high_c)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub low_c: f32,
    pub high_c: f32,
}

impl Thresholds {
    pub const fn new(low_c: f32, high_c: f32) -> Self {
        Self { low_c, high_c }
    }

    pub fn classify(&self, reading: Option<Temperature>) -> Indicator {
        let Some(t) = reading else {
            return Indicator::Unknown;
        };
        let c = t.celsius();
        if c < self.low_c {
            Indicator::Cold
        } else if c < self.high_c {
            Indicator::Normal
        } else {
            Indicator::Hot
        }
    }
}

/// The three Rainbow HAT LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedColour {
    Red,
    Green,
    Blue,
}

impl LedColour {
    pub const ALL: [Self; 3] = [Self::Red, Self::Green, Self::Blue];

    /// Slot index in fixed-size LED arrays.
    pub const fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }
}

/// Indicator state shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Indicator {
    /// No valid reading (sensor missing, read failed, or not yet sampled).
    #[default]
    Unknown,
    Cold,
    Normal,
    Hot,
}

impl Indicator {
    /// The single LED lit in this state, if any.
    pub const fn led(self) -> Option<LedColour> {
        match self {
            Self::Unknown => None,
            Self::Cold => Some(LedColour::Blue),
            Self::Normal => Some(LedColour::Green),
            Self::Hot => Some(LedColour::Red),
        }
    }

    /// Whether the buzzer sounds in this state.
    pub const fn alarms(self) -> bool {
        matches!(self, Self::Hot)
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => "unknown",
            Self::Cold => "cold",
            Self::Normal => "normal",
            Self::Hot => "hot",
        })
    }
}
