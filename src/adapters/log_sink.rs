//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each application event as one
//! structured line through the `log` facade.  On the host binary the
//! `tracing-subscriber` bridge prints them to stderr.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Tick(t) => {
                info!(
                    "TICK  | #{} | T={} | state={} | display={:?}{} | buzzer={} | faults={}",
                    t.tick,
                    t.temperature
                        .map_or_else(|| "--".into(), |c| c.to_string()),
                    t.indicator,
                    t.display_text.as_str(),
                    if t.display_updated { "" } else { " (stale)" },
                    if t.buzzer_active { "on" } else { "off" },
                    t.faults,
                );
            }
            AppEvent::IndicatorChanged { from, to } => {
                info!("STATE | {} -> {}", from, to);
            }
            AppEvent::PeripheralFault(e) => {
                warn!("FAULT | {}", e);
            }
            AppEvent::BuzzerSilenced => {
                info!("TONE  | silenced");
            }
            AppEvent::Started { opened, failed } => {
                info!("START | peripherals opened={} failed={}", opened, failed);
            }
            AppEvent::ShutdownRequested => {
                info!("STOP  | requested");
            }
            AppEvent::Stopped { close_failures } => {
                info!("STOP  | done, close_failures={}", close_failures);
            }
        }
    }
}
