//! Debounced push-button driver with a press callback.
//!
//! ## Hardware
//!
//! Rainbow HAT button C: active-low momentary switch.  The driver samples
//! the level through a [`ButtonPort`] every time the main loop calls
//! [`poll`](ButtonDriver::poll), so the callback always runs on the loop's
//! own thread, never concurrently with a tick.
//!
//! ## Press detection
//!
//! | State       | Level     | Condition                  | Next        |
//! |-------------|-----------|----------------------------|-------------|
//! | Released    | pressed   | -                          | Debounce    |
//! | Debounce    | released  | -                          | Released    |
//! | Debounce    | pressed   | held >= debounce window    | Held (fire) |
//! | Held        | released  | -                          | Released    |
//!
//! Exactly one press event per press transition, however long the button
//! is held.

use log::{debug, warn};

use crate::app::ports::ButtonPort;
use crate::error::DeviceResult;

/// Default debounce window.
pub const DEBOUNCE_MS: u64 = 50;

/// Internal state machine for press detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressState {
    Released,
    Debounce { since_ms: u64 },
    Held,
}

/// Callback fired once per debounced press.
pub type PressCallback = Box<dyn FnMut()>;

pub struct ButtonDriver<P: ButtonPort> {
    port: P,
    state: PressState,
    debounce_ms: u64,
    on_press: Option<PressCallback>,
    /// Suppresses repeated warnings while the input keeps failing.
    read_failing: bool,
}

impl<P: ButtonPort> ButtonDriver<P> {
    pub fn new(port: P, debounce_ms: u64) -> Self {
        Self {
            port,
            state: PressState::Released,
            debounce_ms,
            on_press: None,
            read_failing: false,
        }
    }

    /// Register the press listener, replacing any previous one.
    pub fn set_on_press(&mut self, callback: impl FnMut() + 'static) {
        self.on_press = Some(Box::new(callback));
    }

    /// Sample the button once.  Returns `true` when this call detected a
    /// debounced press (the callback has already run).
    ///
    /// Read failures are reported once per failure streak and treated as
    /// "not pressed".
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let pressed = match self.port.is_pressed() {
            Ok(level) => {
                if self.read_failing {
                    debug!("button: input recovered");
                    self.read_failing = false;
                }
                level
            }
            Err(e) => {
                if !self.read_failing {
                    warn!("button: read failed ({}), treating as released", e);
                    self.read_failing = true;
                }
                false
            }
        };

        match (self.state, pressed) {
            (PressState::Released, true) => {
                self.state = PressState::Debounce { since_ms: now_ms };
                false
            }
            (PressState::Debounce { since_ms }, true) => {
                if now_ms.saturating_sub(since_ms) >= self.debounce_ms {
                    self.state = PressState::Held;
                    debug!("button: press");
                    if let Some(callback) = self.on_press.as_mut() {
                        callback();
                    }
                    true
                } else {
                    false
                }
            }
            (PressState::Held, true) | (PressState::Released, false) => false,
            (PressState::Debounce { .. } | PressState::Held, false) => {
                self.state = PressState::Released;
                false
            }
        }
    }

    /// Drop the listener and release the input.
    pub fn close(&mut self) -> DeviceResult<()> {
        self.on_press = None;
        self.state = PressState::Released;
        self.port.close()
    }

    /// The wrapped level input.
    pub fn port(&self) -> &P {
        &self.port
    }
}
