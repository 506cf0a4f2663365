//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — log to serial, drive a display, etc.

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),

    /// The target speed changed (key press or command).
    TargetChanged { rpm: f32 },

    /// The drive was started or stopped.
    RunStateChanged { running: bool },

    /// A long-press triggered an emergency brake stop.
    EmergencyStop,

    /// The application service has started.
    Started,
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone)]
pub struct TelemetryData {
    pub running: bool,
    pub target_rpm: f32,
    pub measured_rpm: f32,
    pub output_percent: i16,
    pub tick_count: u64,
}
