//! Monitor configuration parameters
//!
//! All tunable parameters for the ThermoHat monitor.  The defaults are the
//! fixed constants the device ships with; a JSON file can override any
//! subset of them (missing fields fall back to the default).

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::app::indicator::Thresholds;

/// Highest HT16K33 dimming level (16 steps, 0–15).
pub const DISPLAY_BRIGHTNESS_MAX: u8 = 0b0000_1111;

/// Which carrier board the Rainbow HAT is mounted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardVariant {
    /// NXP PICO-PI-IMX7D.
    #[default]
    Imx7dPico,
    /// Raspberry Pi 3.
    Rpi3,
}

/// Core monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    // --- Classification ---
    /// Readings below this are Cold (°C)
    pub low_threshold_c: f32,
    /// Readings at or above this are Hot (°C)
    pub high_threshold_c: f32,

    // --- Timing ---
    /// Delay between two monitor ticks (milliseconds)
    pub tick_period_ms: u32,

    // --- Alarm ---
    /// Piezo tone while Hot (Hz)
    pub buzzer_frequency_hz: u32,
    /// How long one alarm tone lasts before it is silenced (milliseconds)
    pub buzzer_tone_ms: u32,

    // --- Display ---
    /// Segment display brightness (0–15)
    pub display_brightness: u8,

    // --- Input ---
    /// Button level must be stable this long to count as a press (milliseconds)
    pub button_debounce_ms: u32,

    // --- Board ---
    pub board: BoardVariant,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            // Classification
            low_threshold_c: 22.0,
            high_threshold_c: 29.0,

            // Timing
            tick_period_ms: 2000,

            // Alarm
            buzzer_frequency_hz: 2000,
            buzzer_tone_ms: 1800,

            // Display
            display_brightness: DISPLAY_BRIGHTNESS_MAX,

            // Input
            button_debounce_ms: 50,

            board: BoardVariant::Imx7dPico,
        }
    }
}

/// Errors from config validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl MonitorConfig {
    /// Reject values that would break the monitor's invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.low_threshold_c.is_finite() || !self.high_threshold_c.is_finite() {
            return Err(ConfigError::ValidationFailed("thresholds must be finite"));
        }
        if self.low_threshold_c >= self.high_threshold_c {
            return Err(ConfigError::ValidationFailed(
                "low_threshold_c must be below high_threshold_c",
            ));
        }
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_period_ms must be > 0"));
        }
        if !(20..=20_000).contains(&self.buzzer_frequency_hz) {
            return Err(ConfigError::ValidationFailed(
                "buzzer_frequency_hz must be within 20..=20000",
            ));
        }
        if self.buzzer_tone_ms > self.tick_period_ms {
            return Err(ConfigError::ValidationFailed(
                "buzzer_tone_ms must not exceed tick_period_ms",
            ));
        }
        if self.display_brightness > DISPLAY_BRIGHTNESS_MAX {
            return Err(ConfigError::ValidationFailed("display_brightness must be <= 15"));
        }
        Ok(())
    }

    /// Classification thresholds derived from this config.
    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.low_threshold_c, self.high_threshold_c)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json).context("malformed config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("loading config {}", path.display()))
    }
}
