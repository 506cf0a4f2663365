//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the key scanner, the target-speed state, and the
//! PID speed controller.  It exposes a clean, hardware-agnostic API.
//! All I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters.
//!
//! ```text
//!  KeyInput ────▶ ┌────────────────────────┐ ──▶ EventSink
//!  SensorPort ──▶ │       AppService       │
//!  MotorPort ◀────│  KeyScanner · PID      │
//!                 └────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::{PidMode, SystemConfig};
use crate::control::pid::{IncrementalPid, PidGains, PositionalPid};
use crate::drivers::button::{KeyEvent, KeyInput, KeyScanner};
use crate::pins;

use super::commands::AppCommand;
use super::events::{AppEvent, TelemetryData};
use super::ports::{EventSink, MotorPort, SensorPort};

// ───────────────────────────────────────────────────────────────
// Speed controller (positional or incremental, per config)
// ───────────────────────────────────────────────────────────────

/// Wraps the two PID forms behind one compute/reset surface so the
/// service body does not branch on the mode at every call site.
enum SpeedPid {
    Positional(PositionalPid),
    Incremental(IncrementalPid),
}

impl SpeedPid {
    fn from_config(config: &SystemConfig) -> Self {
        let gains = PidGains::new(config.pid_kp, config.pid_ki, config.pid_kd);
        let period = config.control_period_secs();
        match config.pid_mode {
            PidMode::Positional => Self::Positional(PositionalPid::new(
                gains,
                period,
                config.output_min,
                config.output_max,
                config.integral_limit,
            )),
            PidMode::Incremental => Self::Incremental(IncrementalPid::new(
                gains,
                period,
                config.output_min,
                config.output_max,
            )),
        }
    }

    fn compute(&mut self, setpoint: f32, measurement: f32) -> f32 {
        match self {
            Self::Positional(pid) => pid.compute(setpoint, measurement),
            Self::Incremental(pid) => pid.compute(setpoint, measurement),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Positional(pid) => pid.reset(),
            Self::Incremental(pid) => pid.reset(),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    config: SystemConfig,
    keys: KeyScanner,
    pid: SpeedPid,
    /// Seconds per control tick (derived from config).
    tick_secs: f32,
    target_rpm: f32,
    measured_rpm: f32,
    output_percent: i16,
    running: bool,
    /// Set by an emergency stop; holds the bridge in brake until the
    /// drive is explicitly restarted.
    brake_latched: bool,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// The drive starts stopped; a RUN/STOP press or
    /// [`AppCommand::SetRunning`] starts it.
    pub fn new(config: SystemConfig) -> Self {
        let tick_secs = config.control_period_secs();
        let keys = KeyScanner::new(
            pins::KEY_GPIOS.len(),
            config.key_debounce_ms,
            config.key_long_press_ms,
        );
        let pid = SpeedPid::from_config(&config);
        let target_rpm = config.initial_target_rpm;

        Self {
            config,
            keys,
            pid,
            tick_secs,
            target_rpm,
            measured_rpm: 0.0,
            output_percent: 0,
            running: false,
            brake_latched: false,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce startup through the sink.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started);
        info!(
            "AppService started (target={:.0}rpm, mode={:?})",
            self.target_rpm, self.config.pid_mode
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle: scan keys → read speed → PID → motor.
    ///
    /// The `hw` parameter satisfies [`KeyInput`], [`SensorPort`] **and**
    /// [`MotorPort`] — this avoids a double mutable borrow while keeping
    /// the port boundary explicit.  `now_ms` is a wrapping millisecond
    /// timestamp from a monotonic clock.
    pub fn tick(
        &mut self,
        hw: &mut (impl KeyInput + SensorPort + MotorPort),
        now_ms: u32,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // 1. Advance the key state machines and consume their events.
        self.keys.scan(hw, now_ms);
        self.handle_key_events(sink);

        // 2. Read the measured speed via SensorPort.
        self.measured_rpm = hw.read_speed_rpm(self.tick_secs);

        // 3. Closed-loop update (or safe idle when stopped).  A failed
        // actuator write is logged, not propagated: the next tick retries
        // with fresh state and the control loop must outlive transient
        // driver faults.
        if self.running {
            let out = self.pid.compute(self.target_rpm, self.measured_rpm);
            self.output_percent = out as i16;
            if let Err(e) = hw.set_motor(self.output_percent) {
                warn!("Motor command failed: {}", e);
            }
        } else {
            // Stale integral/delta state must not kick the motor when the
            // drive restarts.
            self.pid.reset();
            self.output_percent = 0;
            let result = if self.brake_latched {
                hw.brake_motor()
            } else {
                hw.coast_motor()
            };
            if let Err(e) = result {
                warn!("Motor stop command failed: {}", e);
            }
        }
    }

    /// Drain pending key events into target/run-state changes.
    fn handle_key_events(&mut self, sink: &mut impl EventSink) {
        // A long-press on any key is an emergency stop; check all keys
        // before acting so simultaneous holds collapse into one stop.
        let mut emergency = false;

        for id in 0..self.keys.key_count() as u8 {
            let Some(event) = self.keys.take_event(id) else {
                continue;
            };

            if event == KeyEvent::LongPress {
                emergency = true;
                continue;
            }

            match id {
                pins::KEY_SPEED_UP => {
                    self.set_target(self.target_rpm + self.config.rpm_step, sink);
                }
                pins::KEY_SPEED_DOWN => {
                    self.set_target(self.target_rpm - self.config.rpm_step, sink);
                }
                pins::KEY_RUN_STOP => {
                    self.set_running(!self.running, sink);
                }
                other => {
                    warn!("Click on unmapped key {}", other);
                }
            }
        }

        if emergency {
            self.emergency_stop(sink);
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (from serial shell or test harness).
    pub fn handle_command(&mut self, cmd: AppCommand, sink: &mut impl EventSink) {
        match cmd {
            AppCommand::SetTargetRpm(rpm) => self.set_target(rpm, sink),
            AppCommand::SetRunning(run) => self.set_running(run, sink),
            AppCommand::UpdateConfig(new_config) => {
                // A fresh controller avoids carrying state tuned for the
                // old gains/period into the new ones.
                self.pid = SpeedPid::from_config(&new_config);
                self.tick_secs = new_config.control_period_secs();
                self.config = new_config;
                self.set_target(self.target_rpm, sink); // re-clamp to new max
                info!("Configuration updated at runtime");
            }
        }
    }

    // ── Internal state changes ────────────────────────────────

    fn set_target(&mut self, rpm: f32, sink: &mut impl EventSink) {
        let clamped = rpm.clamp(0.0, self.config.max_rpm);
        if clamped != self.target_rpm {
            self.target_rpm = clamped;
            sink.emit(&AppEvent::TargetChanged { rpm: clamped });
        }
    }

    fn set_running(&mut self, running: bool, sink: &mut impl EventSink) {
        if running {
            self.brake_latched = false;
        }
        if running != self.running {
            self.running = running;
            sink.emit(&AppEvent::RunStateChanged { running });
        }
    }

    /// Stop the drive and latch the bridge in brake.  The brake command
    /// goes out on the same tick: `tick()` runs key handling before the
    /// actuator update, and the stopped path honours the latch.
    fn emergency_stop(&mut self, sink: &mut impl EventSink) {
        warn!("Emergency stop (long-press)");
        self.running = false;
        self.brake_latched = true;
        self.pid.reset();
        self.output_percent = 0;
        sink.emit(&AppEvent::EmergencyStop);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the current state.
    pub fn build_telemetry(&self) -> TelemetryData {
        TelemetryData {
            running: self.running,
            target_rpm: self.target_rpm,
            measured_rpm: self.measured_rpm,
            output_percent: self.output_percent,
            tick_count: self.tick_count,
        }
    }

    /// Whether the closed loop is driving the motor.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current target speed in rpm.
    pub fn target_rpm(&self) -> f32 {
        self.target_rpm
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Clone of the live configuration.
    pub fn current_config(&self) -> SystemConfig {
        self.config.clone()
    }
}
