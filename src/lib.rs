//! thermohat: Rainbow HAT temperature monitor.
//!
//! Samples a temperature sensor on a fixed period, classifies the reading
//! as cold / normal / hot, and shows it on three LEDs, a segment display
//! and a piezo buzzer.  A press on button C shuts everything down.
//!
//! The domain ([`app`]) talks to hardware only through the port traits in
//! [`app::ports`]; [`drivers`] binds those ports to `embedded-hal`, and
//! [`adapters`] provides the host-side implementations.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod scheduler;
pub mod signal;
