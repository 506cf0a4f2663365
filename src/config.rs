//! System configuration parameters
//!
//! All tunable parameters for the drivebase system.  Values are compiled-in
//! defaults; runtime updates arrive through `AppCommand::UpdateConfig`.

use serde::{Deserialize, Serialize};

/// Which control law the speed loop runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PidMode {
    /// Absolute-output form: recomputes the full output each tick.
    Positional,
    /// Delta form: accumulates output changes; inherently bumpless.
    Incremental,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Speed loop ---
    /// Control law selection for the speed loop
    pub pid_mode: PidMode,
    /// Proportional gain
    pub pid_kp: f32,
    /// Integral gain
    pub pid_ki: f32,
    /// Derivative gain
    pub pid_kd: f32,
    /// Lower output limit (percent command to the bridge)
    pub output_min: f32,
    /// Upper output limit (percent command to the bridge)
    pub output_max: f32,
    /// Integral accumulator clamp (positional mode only)
    pub integral_limit: f32,

    // --- Target speed ---
    /// Target rpm applied when the drive first starts
    pub initial_target_rpm: f32,
    /// Rpm added/removed per SPEED+/SPEED- click
    pub rpm_step: f32,
    /// Upper bound for the target speed
    pub max_rpm: f32,

    // --- Keys ---
    /// Debounce window for panel keys (milliseconds)
    pub key_debounce_ms: u32,
    /// Hold duration that turns a press into a long-press (milliseconds)
    pub key_long_press_ms: u32,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Telemetry report interval (seconds)
    pub telemetry_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Speed loop
            pid_mode: PidMode::Incremental,
            pid_kp: 0.8,
            pid_ki: 2.5,
            pid_kd: 0.02,
            output_min: -100.0,
            output_max: 100.0,
            integral_limit: 50.0,

            // Target speed
            initial_target_rpm: 60.0,
            rpm_step: 10.0,
            max_rpm: 180.0,

            // Keys
            key_debounce_ms: 20,
            key_long_press_ms: 1000,

            // Timing
            control_loop_interval_ms: 10, // 100 Hz
            telemetry_interval_secs: 5,
        }
    }
}

impl SystemConfig {
    /// Control period in seconds, as handed to the PID controllers.
    pub fn control_period_secs(&self) -> f32 {
        self.control_loop_interval_ms as f32 / 1000.0
    }
}
