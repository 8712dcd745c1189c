//! thermohat host binary.
//!
//! Runs the monitor against the simulated Rainbow HAT.  Every line read
//! from stdin presses button C, which shuts the monitor down.
//!
//! ```text
//!   SimBoard ──▶ Lifecycle ──▶ LogEventSink ──▶ tracing-subscriber
//!      ▲              │
//!   stdin thread   SystemClock
//! ```
//!
//! Usage: `thermohat [config.json]`; `RUST_LOG` sets the log filter.

use std::io::BufRead;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use tracing_subscriber::EnvFilter;

use thermohat::adapters::log_sink::LogEventSink;
use thermohat::adapters::sim_board::{SimBoard, SimPin};
use thermohat::adapters::time::SystemClock;
use thermohat::app::lifecycle::Lifecycle;
use thermohat::app::ports::Clock;
use thermohat::config::MonitorConfig;

/// How long a simulated press holds the button down.
const PRESS_HOLD_MS: u64 = 150;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => MonitorConfig::load(&path)?,
        None => MonitorConfig::default(),
    };
    info!("board: {:?}", config.board);

    let mut board = SimBoard::demo(config.board);
    spawn_button_presser(board.button_pin())?;

    let mut clock = SystemClock::new();
    let mut sink = LogEventSink::new();
    let mut lifecycle = Lifecycle::new(config);
    lifecycle.startup(&mut board, clock.now_ms(), &mut sink)?;
    info!("press Enter to stop");
    lifecycle.run(&mut clock, &mut sink);
    Ok(())
}

/// Press button C once per line of stdin.
fn spawn_button_presser(button: SimPin) -> Result<()> {
    std::thread::Builder::new()
        .name("button".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                if line.is_err() {
                    break;
                }
                button.set_level(false);
                std::thread::sleep(Duration::from_millis(PRESS_HOLD_MS));
                button.set_level(true);
            }
        })
        .context("spawning button thread")?;
    Ok(())
}
