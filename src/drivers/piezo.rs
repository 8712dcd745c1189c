//! Piezo buzzer driver.
//!
//! A PWM channel at 50 % duty drives the piezo; the PWM frequency is the
//! tone.  `embedded-hal` 1.0 only standardises the duty cycle, so the
//! channel must also implement [`TonePwm`] for the frequency.
//!
//! `play` is non-blocking: the tone runs until `stop` (called by the next
//! tick or by the lifecycle's silence timer).

use embedded_hal::pwm::SetDutyCycle;
use log::debug;

use crate::app::ports::BuzzerPort;
use crate::error::{DeviceError, DeviceResult};

/// Duty cycle that gives the loudest square-wave tone.
const TONE_DUTY_PERCENT: u8 = 50;

/// A PWM channel whose output frequency can be changed at runtime.
pub trait TonePwm: SetDutyCycle {
    fn set_frequency_hz(&mut self, hz: u32) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PiezoState {
    Silent,
    Playing { hz: u32 },
}

pub struct PiezoBuzzer<P: TonePwm> {
    pwm: Option<P>,
    state: PiezoState,
}

impl<P: TonePwm> PiezoBuzzer<P> {
    pub fn new(pwm: P) -> Self {
        Self {
            pwm: Some(pwm),
            state: PiezoState::Silent,
        }
    }

    pub fn state(&self) -> PiezoState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, PiezoState::Playing { .. })
    }
}

impl<P: TonePwm> BuzzerPort for PiezoBuzzer<P> {
    fn play(&mut self, frequency_hz: u32) -> DeviceResult<()> {
        if frequency_hz == 0 {
            return Err(DeviceError::Unsupported);
        }
        let pwm = self.pwm.as_mut().ok_or(DeviceError::Closed)?;
        pwm.set_frequency_hz(frequency_hz)
            .map_err(|_| DeviceError::Bus)?;
        pwm.set_duty_cycle_percent(TONE_DUTY_PERCENT)
            .map_err(|_| DeviceError::Bus)?;
        debug!("piezo: {} Hz", frequency_hz);
        self.state = PiezoState::Playing { hz: frequency_hz };
        Ok(())
    }

    fn stop(&mut self) -> DeviceResult<()> {
        let pwm = self.pwm.as_mut().ok_or(DeviceError::Closed)?;
        pwm.set_duty_cycle_fully_off().map_err(|_| DeviceError::Bus)?;
        if self.is_playing() {
            debug!("piezo: silent");
        }
        self.state = PiezoState::Silent;
        Ok(())
    }

    fn close(&mut self) -> DeviceResult<()> {
        let mut pwm = self.pwm.take().ok_or(DeviceError::Closed)?;
        // Never leave the output toggling on a released channel.
        let off = pwm.set_duty_cycle_fully_off().map_err(|_| DeviceError::Bus);
        self.state = PiezoState::Silent;
        off
    }
}
