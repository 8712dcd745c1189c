//! Peripheral drivers: button debouncing and `embedded-hal` bindings.

pub mod button;
pub mod gpio;
pub mod piezo;
