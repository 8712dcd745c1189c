//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements | Connects to                     |
//! |-------------|------------|---------------------------------|
//! | `log_sink`  | EventSink  | `log` facade                    |
//! | `sim_board` | Board      | In-memory pins, PWM and sensor  |
//! | `time`      | Clock      | `std::time::Instant`            |

pub mod log_sink;
#[cfg(feature = "sim")]
pub mod sim_board;
pub mod time;
