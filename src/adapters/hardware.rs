//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the encoder sensor and the H-bridge driver, exposing them through
//! [`SensorPort`], [`MotorPort`] and [`KeyInput`].  This is the only
//! module in the system that touches actual hardware.  On non-espidf
//! targets, the underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{MotorPort, SensorPort};
use crate::drivers::button::KeyInput;
use crate::drivers::hbridge::HBridgeDriver;
use crate::drivers::hw_init;
use crate::pins;
use crate::sensors::encoder::EncoderSensor;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    encoder: EncoderSensor,
    motor: HBridgeDriver,
}

impl HardwareAdapter {
    pub fn new(encoder: EncoderSensor, motor: HBridgeDriver) -> Self {
        Self { encoder, motor }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_speed_rpm(&mut self, elapsed_secs: f32) -> f32 {
        self.encoder.read(elapsed_secs).rpm
    }
}

// ── MotorPort implementation ──────────────────────────────────

impl MotorPort for HardwareAdapter {
    fn set_motor(&mut self, percent: i16) -> crate::error::Result<()> {
        self.motor.set_speed(percent)?;
        Ok(())
    }

    fn coast_motor(&mut self) -> crate::error::Result<()> {
        self.motor.coast()?;
        Ok(())
    }

    fn brake_motor(&mut self) -> crate::error::Result<()> {
        self.motor.brake()?;
        Ok(())
    }

    fn motor_percent(&self) -> i16 {
        self.motor.current_percent()
    }
}

// ── KeyInput implementation ───────────────────────────────────

impl KeyInput for HardwareAdapter {
    fn is_pressed(&mut self, key: u8) -> bool {
        match pins::KEY_GPIOS.get(key as usize) {
            // Keys are active-low: a low level means pressed.
            Some(&gpio) => !hw_init::gpio_read(gpio),
            None => false,
        }
    }
}
