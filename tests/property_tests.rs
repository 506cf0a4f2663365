//! Property and fuzz-style tests for robustness of core data structures.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32 targets.
//! On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use drivebase::control::pid::{IncrementalPid, PidGains, PositionalPid};
use drivebase::drivers::button::{KeyEvent, KeyInput, KeyScanner, MAX_KEYS};
use proptest::prelude::*;

// ── PID output invariants ─────────────────────────────────────

proptest! {
    /// For any gains and any measurement sequence, the positional output
    /// never leaves the configured range and the integral accumulator
    /// never exceeds its clamp.
    #[test]
    fn positional_output_and_integral_always_bounded(
        kp in 0.0f32..=50.0,
        ki in 0.0f32..=50.0,
        kd in 0.0f32..=5.0,
        setpoint in -500.0f32..=500.0,
        measurements in proptest::collection::vec(-500.0f32..=500.0, 1..=200),
    ) {
        let mut pid = PositionalPid::new(
            PidGains::new(kp, ki, kd), 0.01, -100.0, 100.0, 50.0,
        );
        for m in &measurements {
            let out = pid.compute(setpoint, *m);
            prop_assert!((-100.0..=100.0).contains(&out), "output escaped: {out}");
            prop_assert!(pid.integral().abs() <= 50.0, "integral escaped: {}", pid.integral());
        }
    }

    /// With zero integral and derivative gain the positional controller is
    /// exactly a clamped proportional gain.
    #[test]
    fn positional_pure_p_equals_clamped_kp_error(
        kp in 0.1f32..=10.0,
        setpoint in -200.0f32..=200.0,
        measurement in -200.0f32..=200.0,
    ) {
        let mut pid = PositionalPid::new(
            PidGains::new(kp, 0.0, 0.0), 0.01, -100.0, 100.0, 50.0,
        );
        let expected = (kp * (setpoint - measurement)).clamp(-100.0, 100.0);
        let out = pid.compute(setpoint, measurement);
        prop_assert!((out - expected).abs() < 1e-3);
    }

    /// The incremental controller's stored baseline is always the clamped
    /// output — under persistent saturation it sits exactly at the limit,
    /// never beyond it.
    #[test]
    fn incremental_baseline_never_exceeds_limits(
        kp in 0.0f32..=50.0,
        ki in 0.0f32..=50.0,
        measurements in proptest::collection::vec(-500.0f32..=500.0, 1..=200),
    ) {
        let mut pid = IncrementalPid::new(
            PidGains::new(kp, ki, 0.0), 0.01, -100.0, 100.0,
        );
        for m in &measurements {
            let out = pid.compute(400.0, *m);
            prop_assert_eq!(out, pid.last_output());
            prop_assert!(pid.last_output().abs() <= 100.0);
        }
    }

    /// Saturated incremental recovery: after any run that pins the output
    /// high, one step of strongly reversed error must pull the output off
    /// the limit immediately (no windup to burn off).
    #[test]
    fn incremental_recovers_from_saturation_in_one_step(
        steps in 10usize..=200,
    ) {
        let mut pid = IncrementalPid::new(
            PidGains::new(2.0, 20.0, 0.0), 0.01, -100.0, 100.0,
        );
        for _ in 0..steps {
            let _ = pid.compute(1000.0, 0.0);
        }
        prop_assert_eq!(pid.last_output(), 100.0);

        let out = pid.compute(0.0, 1000.0);
        prop_assert!(out < 100.0, "output stuck at the limit after error reversal");
    }
}

// ── Key scanner invariants ────────────────────────────────────

/// Random per-tick level script for a bank of keys.
fn arb_level_script(keys: usize) -> impl Strategy<Value = Vec<Vec<bool>>> {
    proptest::collection::vec(proptest::collection::vec(any::<bool>(), keys), 1..=300)
}

struct ScriptedPins {
    levels: Vec<bool>,
}

impl KeyInput for ScriptedPins {
    fn is_pressed(&mut self, key: u8) -> bool {
        self.levels.get(key as usize).copied().unwrap_or(false)
    }
}

proptest! {
    /// Under arbitrary level noise the scanner never loses a key record,
    /// every queried state is one of the four machine states, and events
    /// are delivered at most once per scan step.
    #[test]
    fn key_scanner_survives_arbitrary_noise(
        script in arb_level_script(3),
        start_ms in any::<u32>(),
    ) {
        let mut scanner = KeyScanner::new(3, 20, 1000);
        let mut now = start_ms;

        for step in script {
            let mut pins = ScriptedPins { levels: step };
            scanner.scan(&mut pins, now);
            now = now.wrapping_add(10);

            for id in 0..3u8 {
                prop_assert!(scanner.state(id).is_some());
                // Exactly-once delivery: a second take in the same step
                // must always be empty.
                if scanner.take_event(id).is_some() {
                    prop_assert_eq!(scanner.take_event(id), None);
                }
            }
        }
    }

    /// Unknown ids are inert for any scanner size and any id past the end.
    #[test]
    fn unknown_key_ids_are_always_inert(
        count in 1usize..=MAX_KEYS,
        stray_id in 0u8..=255,
    ) {
        let mut scanner = KeyScanner::new(count, 20, 1000);
        prop_assume!(stray_id as usize >= count);

        prop_assert_eq!(scanner.take_event(stray_id), None);
        prop_assert!(scanner.state(stray_id).is_none());
    }

    /// A clean press shorter than the long-press threshold produces exactly
    /// one SingleClick for any hold duration past the debounce window,
    /// regardless of where the timestamps sit in u32 space.
    #[test]
    fn clean_short_press_is_always_one_click(
        hold_ms in 31u32..=999,
        start_ms in any::<u32>(),
    ) {
        let mut scanner = KeyScanner::new(1, 20, 1000);
        let mut now = start_ms;

        let mut pins = ScriptedPins { levels: vec![true] };
        let mut held = 0u32;
        while held <= hold_ms {
            scanner.scan(&mut pins, now);
            now = now.wrapping_add(10);
            held += 10;
        }

        pins.levels[0] = false;
        scanner.scan(&mut pins, now);

        prop_assert_eq!(scanner.take_event(0), Some(KeyEvent::SingleClick));
        prop_assert_eq!(scanner.take_event(0), None);
    }
}
