//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (encoder, H-bridge, key pins, event sinks) implement
//! these traits.  The [`AppService`](super::service::AppService) consumes
//! them via generics, so the domain core never touches hardware directly.
//!
//! The raw key-level capability lives in
//! [`KeyInput`](crate::drivers::button::KeyInput) next to the debounce
//! engine; the hardware adapter implements it alongside the ports below.

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain the measured shaft speed.
pub trait SensorPort {
    /// Measured speed in rpm over the last `elapsed_secs` window.
    fn read_speed_rpm(&mut self, elapsed_secs: f32) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Motor port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command the drive motor.
///
/// The commands are fallible: a failed register write surfaces as a
/// [`crate::error::Error`] so the service can log it and keep its loop
/// alive instead of silently losing the command.
pub trait MotorPort {
    /// Apply a signed speed command (−100..=100 percent).
    fn set_motor(&mut self, percent: i16) -> crate::error::Result<()>;

    /// Free-running stop (outputs Hi-Z).
    fn coast_motor(&mut self) -> crate::error::Result<()>;

    /// Fast stop (windings shorted).
    fn brake_motor(&mut self) -> crate::error::Result<()>;

    /// Signed command currently applied; 0 when stopped.
    fn motor_percent(&self) -> i16;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log,
/// a future display, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
