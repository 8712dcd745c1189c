//! Simulated Rainbow HAT.
//!
//! Stands in for the real board on the host.  LEDs, button and piezo go
//! through the same `embedded-hal` bindings a real board would use
//! ([`GpioLed`], [`GpioButton`], [`PiezoBuzzer`]); only the pins and PWM
//! channel underneath are in-memory.  The sensor plays back a scripted,
//! cyclic profile and the display logs what it shows.
//!
//! Pins are shared handles: cloning a [`SimPin`] gives another view of
//! the same level, which is how the host binary "presses" button C from
//! its stdin thread.

use core::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};
use log::{debug, info};

use crate::app::indicator::{DISPLAY_TEXT_MAX, LedColour};
use crate::app::ports::{Board, DisplayPort, Oversampling, SensorMode, TemperaturePort};
use crate::config::{BoardVariant, DISPLAY_BRIGHTNESS_MAX};
use crate::drivers::gpio::{GpioButton, GpioLed};
use crate::drivers::piezo::{PiezoBuzzer, TonePwm};
use crate::error::{DeviceError, DeviceResult};
use crate::pins::{BMP280_I2C_ADDRESS, BoardPins, HT16K33_I2C_ADDRESS};

/// Readings that walk through every indicator state, including a failed
/// read and a value that rounds up onto the hot threshold.
pub const DEMO_PROFILE: [Option<f32>; 6] = [
    Some(21.5),
    Some(25.0),
    Some(30.0),
    None,
    Some(28.996),
    Some(18.25),
];

// ───────────────────────────────────────────────────────────────
// Pins and PWM
// ───────────────────────────────────────────────────────────────

/// In-memory digital line.  Clones share the level.
#[derive(Debug, Clone, Default)]
pub struct SimPin(Arc<AtomicBool>);

impl SimPin {
    pub fn new(high: bool) -> Self {
        Self(Arc::new(AtomicBool::new(high)))
    }

    pub fn set_level(&self, high: bool) {
        self.0.store(high, Ordering::Release);
    }

    pub fn is_set_high(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl digital::ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.set_level(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.set_level(true);
        Ok(())
    }
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.is_set_high())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.is_set_high())
    }
}

/// In-memory PWM channel with an adjustable frequency.  It only logs.
#[derive(Debug)]
pub struct SimPwm {
    channel: &'static str,
}

impl SimPwm {
    pub fn new(channel: &'static str) -> Self {
        Self { channel }
    }
}

impl pwm::ErrorType for SimPwm {
    type Error = Infallible;
}

impl SetDutyCycle for SimPwm {
    fn max_duty_cycle(&self) -> u16 {
        u16::from(u8::MAX)
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        debug!("{}: duty {}/{}", self.channel, duty, self.max_duty_cycle());
        Ok(())
    }
}

impl TonePwm for SimPwm {
    fn set_frequency_hz(&mut self, hz: u32) -> Result<(), Infallible> {
        debug!("{}: {} Hz", self.channel, hz);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Sensor
// ───────────────────────────────────────────────────────────────

/// Scripted temperature sensor.  Each read returns the next profile entry
/// (`None` is a bus failure) and wraps around at the end.
#[derive(Debug)]
pub struct SimThermometer {
    profile: Vec<Option<f32>>,
    next: usize,
    mode: SensorMode,
    closed: bool,
}

impl SimThermometer {
    pub fn new(profile: &[Option<f32>]) -> Self {
        Self {
            profile: profile.to_vec(),
            next: 0,
            mode: SensorMode::Sleep,
            closed: false,
        }
    }

    pub fn mode(&self) -> SensorMode {
        self.mode
    }
}

impl TemperaturePort for SimThermometer {
    fn configure(&mut self, oversampling: Oversampling, mode: SensorMode) -> DeviceResult<()> {
        if self.closed {
            return Err(DeviceError::Closed);
        }
        if oversampling == Oversampling::Skipped && mode != SensorMode::Sleep {
            // Temperature measurement switched off: nothing to read.
            return Err(DeviceError::Unsupported);
        }
        debug!("bmp280@{:#04x}: {:?}, {:?}", BMP280_I2C_ADDRESS, oversampling, mode);
        self.mode = mode;
        Ok(())
    }

    fn read_celsius(&mut self) -> DeviceResult<f32> {
        if self.closed {
            return Err(DeviceError::Closed);
        }
        if self.mode == SensorMode::Sleep {
            return Err(DeviceError::InvalidState);
        }
        if self.profile.is_empty() {
            return Err(DeviceError::InvalidState);
        }
        let sample = self.profile[self.next];
        self.next = (self.next + 1) % self.profile.len();
        sample.ok_or(DeviceError::Bus)
    }

    fn close(&mut self) -> DeviceResult<()> {
        if self.closed {
            return Err(DeviceError::Closed);
        }
        self.closed = true;
        self.mode = SensorMode::Sleep;
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Display
// ───────────────────────────────────────────────────────────────

/// Segment display that logs its content.
#[derive(Debug, Default)]
pub struct SimDisplay {
    brightness: u8,
    enabled: bool,
    text: String,
    closed: bool,
}

impl SimDisplay {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn check_open(&self) -> DeviceResult<()> {
        if self.closed { Err(DeviceError::Closed) } else { Ok(()) }
    }
}

impl DisplayPort for SimDisplay {
    fn set_brightness(&mut self, level: u8) -> DeviceResult<()> {
        self.check_open()?;
        if level > DISPLAY_BRIGHTNESS_MAX {
            return Err(DeviceError::InvalidData);
        }
        self.brightness = level;
        Ok(())
    }

    fn set_enabled(&mut self, enabled: bool) -> DeviceResult<()> {
        self.check_open()?;
        self.enabled = enabled;
        Ok(())
    }

    fn show(&mut self, text: &str) -> DeviceResult<()> {
        self.check_open()?;
        if !self.enabled {
            return Err(DeviceError::InvalidState);
        }
        if text.len() > DISPLAY_TEXT_MAX {
            return Err(DeviceError::InvalidData);
        }
        if self.text != text {
            info!(
                "ht16k33@{:#04x} [{:>5}] (brightness {})",
                HT16K33_I2C_ADDRESS, text, self.brightness
            );
        }
        self.text.clear();
        self.text.push_str(text);
        Ok(())
    }

    fn clear(&mut self) -> DeviceResult<()> {
        self.check_open()?;
        self.text.clear();
        Ok(())
    }

    fn close(&mut self) -> DeviceResult<()> {
        self.check_open()?;
        self.closed = true;
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Board
// ───────────────────────────────────────────────────────────────

pub struct SimBoard {
    pins: BoardPins,
    profile: Vec<Option<f32>>,
    leds: [SimPin; 3],
    /// Button C, pulled up: high means released.
    button: SimPin,
}

impl SimBoard {
    pub fn new(board: BoardVariant, profile: &[Option<f32>]) -> Self {
        Self {
            pins: BoardPins::for_board(board),
            profile: profile.to_vec(),
            leds: Default::default(),
            button: SimPin::new(true),
        }
    }

    /// Default board with a custom sensor script.
    pub fn with_profile(profile: &[Option<f32>]) -> Self {
        Self::new(BoardVariant::default(), profile)
    }

    /// Board replaying [`DEMO_PROFILE`].
    pub fn demo(board: BoardVariant) -> Self {
        Self::new(board, &DEMO_PROFILE)
    }

    pub fn pins(&self) -> &BoardPins {
        &self.pins
    }

    /// Shared view of button C's level.  Drive it low to press.
    pub fn button_pin(&self) -> SimPin {
        self.button.clone()
    }

    /// Shared view of one LED line.
    pub fn led_pin(&self, colour: LedColour) -> SimPin {
        self.leds[colour.index()].clone()
    }
}

impl Board for SimBoard {
    type Led = GpioLed<SimPin>;
    type Sensor = SimThermometer;
    type Display = SimDisplay;
    type Buzzer = PiezoBuzzer<SimPwm>;
    type Button = GpioButton<SimPin>;

    fn open_led(&mut self, colour: LedColour) -> DeviceResult<Self::Led> {
        let name = self.pins.led(colour);
        debug!("open led {:?} on {}", colour, name);
        Ok(GpioLed::new(self.leds[colour.index()].clone(), name))
    }

    fn open_sensor(&mut self) -> DeviceResult<Self::Sensor> {
        debug!("open bmp280 on {}", self.pins.i2c_bus);
        Ok(SimThermometer::new(&self.profile))
    }

    fn open_display(&mut self) -> DeviceResult<Self::Display> {
        debug!("open ht16k33 on {}", self.pins.i2c_bus);
        Ok(SimDisplay::default())
    }

    fn open_buzzer(&mut self) -> DeviceResult<Self::Buzzer> {
        debug!("open piezo on {}", self.pins.piezo_pwm);
        Ok(PiezoBuzzer::new(SimPwm::new(self.pins.piezo_pwm)))
    }

    fn open_button(&mut self) -> DeviceResult<Self::Button> {
        debug!("open button C on {}", self.pins.button_c);
        Ok(GpioButton::new(self.button.clone()))
    }
}
