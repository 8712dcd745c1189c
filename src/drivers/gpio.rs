//! GPIO bindings for the Rainbow HAT LEDs and buttons.
//!
//! Generic over the `embedded-hal` 1.0 digital traits, so the same driver
//! runs on a Linux GPIO character device, a vendor HAL, or the in-memory
//! [`SimPin`](crate::adapters::sim_board::SimPin).

use embedded_hal::digital::{InputPin, OutputPin};
use log::debug;

use crate::app::ports::{ButtonPort, LedPort};
use crate::error::{DeviceError, DeviceResult};

/// Active-high LED on a push-pull output.
pub struct GpioLed<P: OutputPin> {
    pin: Option<P>,
    name: &'static str,
    lit: bool,
}

impl<P: OutputPin> GpioLed<P> {
    pub fn new(pin: P, name: &'static str) -> Self {
        Self {
            pin: Some(pin),
            name,
            lit: false,
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

impl<P: OutputPin> LedPort for GpioLed<P> {
    fn set(&mut self, on: bool) -> DeviceResult<()> {
        let pin = self.pin.as_mut().ok_or(DeviceError::Closed)?;
        let result = if on { pin.set_high() } else { pin.set_low() };
        result.map_err(|_| DeviceError::Bus)?;
        if self.lit != on {
            debug!("led {}: {}", self.name, if on { "on" } else { "off" });
        }
        self.lit = on;
        Ok(())
    }

    fn close(&mut self) -> DeviceResult<()> {
        self.pin.take().map(drop).ok_or(DeviceError::Closed)
    }
}

/// Active-low push-button (pressed = pin pulled to ground).
pub struct GpioButton<P: InputPin> {
    pin: Option<P>,
}

impl<P: InputPin> GpioButton<P> {
    pub fn new(pin: P) -> Self {
        Self { pin: Some(pin) }
    }
}

impl<P: InputPin> ButtonPort for GpioButton<P> {
    fn is_pressed(&mut self) -> DeviceResult<bool> {
        let pin = self.pin.as_mut().ok_or(DeviceError::Closed)?;
        pin.is_low().map_err(|_| DeviceError::Bus)
    }

    fn close(&mut self) -> DeviceResult<()> {
        self.pin.take().map(drop).ok_or(DeviceError::Closed)
    }
}
