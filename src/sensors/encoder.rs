//! Optical encoder speed sensor.
//!
//! The encoder disc produces one pulse per slot; an ISR increments an
//! atomic counter on each rising edge, and the `read` method samples and
//! resets it to compute shaft speed.
//!
//! The ISR and the main loop run at different priorities, so the counter
//! is an `AtomicU32` shared lock-free between both contexts.

use core::sync::atomic::{AtomicU32, Ordering};

/// Slots on the encoder disc: pulses per shaft revolution.
const PULSES_PER_REV: f32 = 20.0;

/// Global atomic counter incremented by the GPIO ISR.
/// `static` because ISR callbacks in ESP-IDF cannot capture closures.
static ENCODER_PULSE_COUNT: AtomicU32 = AtomicU32::new(0);

/// Called from the GPIO ISR on each rising edge.
pub fn encoder_isr_handler() {
    ENCODER_PULSE_COUNT.fetch_add(1, Ordering::Relaxed);
}

/// Result of a speed measurement.
#[derive(Debug, Clone, Copy)]
pub struct EncoderReading {
    /// Pulses counted in the measurement window.
    pub pulse_count: u32,
    /// Shaft speed in revolutions per minute (unsigned — the encoder has
    /// no direction channel; sign comes from the commanded direction).
    pub rpm: f32,
}

/// Encoder speed sensor driver.
pub struct EncoderSensor {
    /// GPIO pin number (stored for diagnostics / re-init).
    _gpio: i32,
}

impl EncoderSensor {
    pub fn new(gpio: i32) -> Self {
        Self { _gpio: gpio }
    }

    /// Sample the atomic pulse counter, reset it, and compute rpm.
    ///
    /// `elapsed_secs` is the time since the last call (the control period).
    pub fn read(&mut self, elapsed_secs: f32) -> EncoderReading {
        // Atomically swap the counter to zero and read the old value.
        let count = ENCODER_PULSE_COUNT.swap(0, Ordering::Relaxed);

        let rpm = if elapsed_secs > 0.0 {
            count as f32 / elapsed_secs * 60.0 / PULSES_PER_REV
        } else {
            0.0
        };

        EncoderReading {
            pulse_count: count,
            rpm,
        }
    }
}
