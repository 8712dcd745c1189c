//! Rainbow HAT pin / bus assignments.
//!
//! Single source of truth: every binding references this module rather
//! than hard-coding pin names.  The HAT is the same on both carrier boards;
//! only the SoC-side names differ.

use crate::app::indicator::LedColour;
use crate::config::BoardVariant;

// ---------------------------------------------------------------------------
// I²C devices (shared bus)
// ---------------------------------------------------------------------------

/// BMP280 temperature / pressure sensor (SDO tied high).
pub const BMP280_I2C_ADDRESS: u8 = 0x77;
/// HT16K33 14-segment display controller.
pub const HT16K33_I2C_ADDRESS: u8 = 0x70;

// ---------------------------------------------------------------------------
// Per-board names
// ---------------------------------------------------------------------------

/// Peripheral names as the board's peripheral manager knows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardPins {
    pub led_red: &'static str,
    pub led_green: &'static str,
    pub led_blue: &'static str,
    /// Button C, the one wired to shutdown.
    pub button_c: &'static str,
    pub piezo_pwm: &'static str,
    pub i2c_bus: &'static str,
}

const IMX7D_PICO: BoardPins = BoardPins {
    led_red: "GPIO2_IO02",
    led_green: "GPIO2_IO00",
    led_blue: "GPIO2_IO05",
    button_c: "GPIO2_IO07",
    piezo_pwm: "PWM2",
    i2c_bus: "I2C1",
};

const RPI3: BoardPins = BoardPins {
    led_red: "BCM6",
    led_green: "BCM19",
    led_blue: "BCM26",
    button_c: "BCM16",
    piezo_pwm: "PWM1",
    i2c_bus: "I2C1",
};

impl BoardPins {
    pub const fn for_board(board: BoardVariant) -> Self {
        match board {
            BoardVariant::Imx7dPico => IMX7D_PICO,
            BoardVariant::Rpi3 => RPI3,
        }
    }

    pub const fn led(&self, colour: LedColour) -> &'static str {
        match colour {
            LedColour::Red => self.led_red,
            LedColour::Green => self.led_green,
            LedColour::Blue => self.led_blue,
        }
    }
}
