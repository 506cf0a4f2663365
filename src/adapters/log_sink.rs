//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! A future display adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | {} | target={:.0}rpm | actual={:.0}rpm | out={}% | tick={}",
                    if t.running { "RUN" } else { "STOP" },
                    t.target_rpm,
                    t.measured_rpm,
                    t.output_percent,
                    t.tick_count,
                );
            }
            AppEvent::TargetChanged { rpm } => {
                info!("TARGET | {:.0}rpm", rpm);
            }
            AppEvent::RunStateChanged { running } => {
                info!("DRIVE | {}", if *running { "started" } else { "stopped" });
            }
            AppEvent::EmergencyStop => {
                warn!("DRIVE | emergency stop");
            }
            AppEvent::Started => {
                info!("START | service up");
            }
        }
    }
}
