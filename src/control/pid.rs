//! Generic PID control primitives for the motor speed loop.
//!
//! Two interchangeable forms:
//!
//! - [`PositionalPid`] — classic absolute-output PID with a clamped
//!   integral accumulator (explicit anti-windup).
//! - [`IncrementalPid`] — delta-output PID; each call adds a computed
//!   increment to the previous *clamped* output, which is its built-in
//!   anti-windup.
//!
//! Both are pure stateful transforms: no I/O, no allocation, deterministic
//! given state and inputs. The sample period is a per-instance configuration
//! value; the caller must invoke `compute()` at exactly that cadence. This
//! precondition is not validated at runtime — calling at a different rate
//! produces silently wrong control behaviour.

/// Proportional / integral / derivative coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

impl PidGains {
    pub const fn new(kp: f32, ki: f32, kd: f32) -> Self {
        Self { kp, ki, kd }
    }
}

// ---------------------------------------------------------------------------
// Positional form
// ---------------------------------------------------------------------------

/// Classic positional PID controller.
///
/// Output(k) = Kp·e(k) + Ki·Σe(j)·T + Kd·[e(k) − e(k−1)]/T, clamped to the
/// configured output range. The integral accumulator is clamped to
/// ±`integral_limit` after every update, so it can never grow without bound
/// while the process is unable to reach the setpoint.
pub struct PositionalPid {
    gains: PidGains,
    /// Sample period in seconds. Must match the caller's invocation cadence.
    period_s: f32,
    integral: f32,
    prev_error: f32,
    output_min: f32,
    output_max: f32,
    integral_limit: f32,
}

impl PositionalPid {
    /// `period_s` must be a positive value; the division in the derivative
    /// term relies on it.
    pub fn new(
        gains: PidGains,
        period_s: f32,
        output_min: f32,
        output_max: f32,
        integral_limit: f32,
    ) -> Self {
        debug_assert!(period_s > 0.0, "sample period must be positive");
        Self {
            gains,
            period_s,
            integral: 0.0,
            prev_error: 0.0,
            output_min,
            output_max,
            integral_limit,
        }
    }

    /// Run one control step and return the clamped output.
    pub fn compute(&mut self, setpoint: f32, measurement: f32) -> f32 {
        let error = setpoint - measurement;

        // Accumulate error·T, then clamp (anti-windup).
        self.integral += error * self.period_s;
        self.integral = self.integral.clamp(-self.integral_limit, self.integral_limit);

        let p = self.gains.kp * error;
        let i = self.gains.ki * self.integral;
        let d = self.gains.kd * (error - self.prev_error) / self.period_s;

        self.prev_error = error;

        (p + i + d).clamp(self.output_min, self.output_max)
    }

    /// Zero the accumulated state, keeping gains and limits.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_error = 0.0;
    }

    /// Current integral accumulator (telemetry / test inspection).
    pub fn integral(&self) -> f32 {
        self.integral
    }
}

// ---------------------------------------------------------------------------
// Incremental form
// ---------------------------------------------------------------------------

/// Incremental (velocity-form) PID controller.
///
/// ΔOutput(k) = Kp·[e(k)−e(k−1)] + Ki·e(k)·T + Kd·[e(k)−2e(k−1)+e(k−2)]/T,
/// Output(k) = Output(k−1) + ΔOutput(k), clamped to the output range.
///
/// `last_output` always holds the most recent *clamped* output. Feeding the
/// clamped value into the next step is this form's anti-windup: when the
/// output saturates, the stored value stops growing, so raw deltas never
/// accumulate unboundedly. Storing the unclamped value instead would
/// reintroduce integral windup.
pub struct IncrementalPid {
    gains: PidGains,
    /// Sample period in seconds. Must match the caller's invocation cadence.
    period_s: f32,
    last_error: f32,
    prev_error: f32,
    last_output: f32,
    output_min: f32,
    output_max: f32,
}

impl IncrementalPid {
    pub fn new(gains: PidGains, period_s: f32, output_min: f32, output_max: f32) -> Self {
        debug_assert!(period_s > 0.0, "sample period must be positive");
        Self {
            gains,
            period_s,
            last_error: 0.0,
            prev_error: 0.0,
            last_output: 0.0,
            output_min,
            output_max,
        }
    }

    /// Run one control step and return the clamped output.
    pub fn compute(&mut self, setpoint: f32, measurement: f32) -> f32 {
        let error = setpoint - measurement;

        let p_inc = self.gains.kp * (error - self.last_error);
        let i_inc = self.gains.ki * error * self.period_s;
        let d_inc =
            self.gains.kd * (error - 2.0 * self.last_error + self.prev_error) / self.period_s;

        let output =
            (self.last_output + p_inc + i_inc + d_inc).clamp(self.output_min, self.output_max);

        self.prev_error = self.last_error;
        self.last_error = error;
        // Post-clamp value only — see the type-level doc comment.
        self.last_output = output;

        output
    }

    /// Zero the accumulated state, keeping gains and limits.
    pub fn reset(&mut self) {
        self.last_error = 0.0;
        self.prev_error = 0.0;
        self.last_output = 0.0;
    }

    /// Most recent clamped output (telemetry / test inspection).
    pub fn last_output(&self) -> f32 {
        self.last_output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: f32 = 0.01;

    fn positional(kp: f32, ki: f32, kd: f32) -> PositionalPid {
        PositionalPid::new(PidGains::new(kp, ki, kd), PERIOD, -100.0, 100.0, 50.0)
    }

    #[test]
    fn pure_proportional_matches_clamped_kp_error() {
        let mut pid = positional(2.0, 0.0, 0.0);
        assert_eq!(pid.compute(10.0, 4.0), 12.0); // 2.0 * 6.0
        assert_eq!(pid.compute(10.0, -60.0), 100.0); // clamped high
        assert_eq!(pid.compute(-200.0, 0.0), -100.0); // clamped low
    }

    #[test]
    fn output_always_within_limits() {
        let mut pid = positional(50.0, 20.0, 5.0);
        for step in 0..500 {
            let out = pid.compute(1000.0, step as f32);
            assert!((-100.0..=100.0).contains(&out), "out of range: {out}");
        }
    }

    #[test]
    fn integral_clamped_to_limit() {
        let mut pid = positional(0.0, 1.0, 0.0);
        // Large persistent error: integral would grow 10 per call unclamped.
        for _ in 0..200 {
            let _ = pid.compute(1000.0, 0.0);
            assert!(pid.integral().abs() <= 50.0);
        }
        assert_eq!(pid.integral(), 50.0);

        // Reverse the error sign: accumulator clamps symmetrically.
        for _ in 0..200 {
            let _ = pid.compute(-1000.0, 0.0);
            assert!(pid.integral().abs() <= 50.0);
        }
        assert_eq!(pid.integral(), -50.0);
    }

    #[test]
    fn derivative_reacts_to_error_change() {
        let mut pid = positional(0.0, 0.0, 0.01);
        let first = pid.compute(10.0, 0.0); // error jumps 0 -> 10
        assert!((first - 10.0).abs() < 1e-4); // 0.01 * 10 / 0.01
        let second = pid.compute(10.0, 0.0); // error unchanged
        assert_eq!(second, 0.0);
    }

    #[test]
    fn reset_clears_accumulated_state() {
        let mut pid = positional(1.0, 1.0, 0.0);
        for _ in 0..50 {
            let _ = pid.compute(100.0, 0.0);
        }
        assert!(pid.integral() > 0.0);
        pid.reset();
        assert_eq!(pid.integral(), 0.0);
        // First call after reset behaves like a fresh controller.
        let out = pid.compute(10.0, 0.0);
        assert!((out - (10.0 + 0.1)).abs() < 1e-4); // kp*e + ki*(e*T)
    }

    #[test]
    fn incremental_matches_hand_computed_deltas() {
        let mut pid = IncrementalPid::new(PidGains::new(1.0, 10.0, 0.0), PERIOD, -100.0, 100.0);
        // e=5: delta = 1*(5-0) + 10*5*0.01 = 5.5
        assert!((pid.compute(5.0, 0.0) - 5.5).abs() < 1e-4);
        // e=3: delta = 1*(3-5) + 10*3*0.01 = -1.7; output = 5.5 - 1.7
        assert!((pid.compute(5.0, 2.0) - 3.8).abs() < 1e-4);
    }

    #[test]
    fn incremental_stores_clamped_output_when_saturated() {
        let mut pid = IncrementalPid::new(PidGains::new(5.0, 50.0, 0.0), PERIOD, -100.0, 100.0);
        // Persistent large error drives the output into saturation. The raw
        // delta sum would keep climbing; the stored output must not.
        for _ in 0..100 {
            let out = pid.compute(1000.0, 0.0);
            assert!(out <= 100.0);
            assert_eq!(pid.last_output(), out);
        }
        assert_eq!(pid.last_output(), 100.0);

        // Recovery is immediate: once the error flips, the next delta is
        // applied to 100.0, not to the ghost sum.
        let out = pid.compute(0.0, 1000.0);
        assert!(out < 100.0);
    }

    #[test]
    fn incremental_reset_returns_to_zero_output_baseline() {
        let mut pid = IncrementalPid::new(PidGains::new(1.0, 1.0, 0.0), PERIOD, -100.0, 100.0);
        let _ = pid.compute(50.0, 0.0);
        pid.reset();
        assert_eq!(pid.last_output(), 0.0);
        let out = pid.compute(0.0, 0.0);
        assert_eq!(out, 0.0);
    }
}
