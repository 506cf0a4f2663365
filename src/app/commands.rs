//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (serial shell,
//! test harness) that the [`AppService`](super::service::AppService)
//! interprets and acts upon.  The front-panel keys take the same paths
//! internally, so command handling and key handling cannot diverge.

use crate::config::SystemConfig;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Set the target speed directly (clamped to `[0, max_rpm]`).
    SetTargetRpm(f32),

    /// Start (`true`) or stop (`false`) the closed-loop drive.
    SetRunning(bool),

    /// Hot-reload configuration; rebuilds the PID controller.
    UpdateConfig(SystemConfig),
}
