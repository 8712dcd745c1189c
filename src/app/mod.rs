//! Application core: pure domain logic, zero I/O.
//!
//! Classification and the tick cycle live here, together with the
//! lifecycle that owns the peripheral handles.  All interaction with
//! hardware happens through the **port traits** in [`ports`], keeping
//! this layer testable without real peripherals.

pub mod events;
pub mod indicator;
pub mod lifecycle;
pub mod monitor;
pub mod peripherals;
pub mod ports;
