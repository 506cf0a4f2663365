//! Gear-motor H-bridge driver (DRV8871).
//!
//! Signed-percentage speed command over two direction inputs (IN1/IN2) and
//! a LEDC PWM channel. Truth table:
//!
//! | IN1 | IN2 | PWM  | Motor            |
//! |-----|-----|------|------------------|
//! | H   | L   | duty | forward          |
//! | L   | H   | duty | reverse          |
//! | L   | L   | 0    | coast (free-run) |
//! | H   | H   | 0    | brake (shorted)  |
//!
//! All commands return a typed [`ActuatorError`] when the underlying pin
//! or duty write fails; the tracked state is only updated on success.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives real PWM and GPIO via hw_init helpers.
//! On host/test: the helpers are no-op stubs and state is tracked in-memory.

use crate::drivers::hw_init;
use crate::error::ActuatorError;
use crate::pins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorState {
    /// Both inputs low, outputs Hi-Z — the motor spins down on friction.
    Coast,
    /// Both inputs high — the windings are shorted for fast stopping.
    Brake,
    /// Running at the given signed percentage (negative = reverse).
    Running { percent: i16 },
}

pub struct HBridgeDriver {
    state: MotorState,
}

impl HBridgeDriver {
    /// Starts in coast: `hw_init::init_peripherals()` leaves both bridge
    /// inputs low, so a fresh driver matches the hardware state.
    pub fn new() -> Self {
        Self {
            state: MotorState::Coast,
        }
    }

    /// Command a signed speed percentage, clamped to ±100.
    /// Zero coasts rather than braking (matches the panel's expectation of
    /// a gentle stop when the setpoint reaches zero).
    pub fn set_speed(&mut self, percent: i16) -> Result<(), ActuatorError> {
        let percent = percent.clamp(-100, 100);
        if percent == 0 {
            return self.coast();
        }

        let forward = percent > 0;
        hw_init::gpio_write(pins::MOTOR_IN1_GPIO, forward)?;
        hw_init::gpio_write(pins::MOTOR_IN2_GPIO, !forward)?;
        self.set_duty_hw(percent.unsigned_abs() as u8)?;

        self.state = MotorState::Running { percent };
        Ok(())
    }

    /// Free-running stop: IN1=IN2=LOW, PWM off.
    pub fn coast(&mut self) -> Result<(), ActuatorError> {
        hw_init::gpio_write(pins::MOTOR_IN1_GPIO, false)?;
        hw_init::gpio_write(pins::MOTOR_IN2_GPIO, false)?;
        self.set_duty_hw(0)?;
        self.state = MotorState::Coast;
        Ok(())
    }

    /// Fast stop: IN1=IN2=HIGH shorts the windings, PWM off.
    pub fn brake(&mut self) -> Result<(), ActuatorError> {
        hw_init::gpio_write(pins::MOTOR_IN1_GPIO, true)?;
        hw_init::gpio_write(pins::MOTOR_IN2_GPIO, true)?;
        self.set_duty_hw(0)?;
        self.state = MotorState::Brake;
        Ok(())
    }

    fn set_duty_hw(&self, duty_percent: u8) -> Result<(), ActuatorError> {
        let duty_8bit = ((duty_percent.min(100) as u16) * 255 / 100) as u8;
        hw_init::ledc_set(hw_init::LEDC_CH_MOTOR, duty_8bit)
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    /// Signed command currently applied; 0 when coasting or braking.
    pub fn current_percent(&self) -> i16 {
        match self.state {
            MotorState::Running { percent } => percent,
            MotorState::Coast | MotorState::Brake => 0,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, MotorState::Running { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_coasting() {
        let drv = HBridgeDriver::new();
        assert_eq!(drv.state(), MotorState::Coast);
        assert_eq!(drv.current_percent(), 0);
    }

    #[test]
    fn set_speed_clamps_to_plus_minus_100() {
        let mut drv = HBridgeDriver::new();
        drv.set_speed(250).unwrap();
        assert_eq!(drv.state(), MotorState::Running { percent: 100 });
        drv.set_speed(-250).unwrap();
        assert_eq!(drv.state(), MotorState::Running { percent: -100 });
    }

    #[test]
    fn zero_speed_coasts() {
        let mut drv = HBridgeDriver::new();
        drv.set_speed(60).unwrap();
        assert!(drv.is_running());
        drv.set_speed(0).unwrap();
        assert_eq!(drv.state(), MotorState::Coast);
    }

    #[test]
    fn brake_overrides_running() {
        let mut drv = HBridgeDriver::new();
        drv.set_speed(-80).unwrap();
        drv.brake().unwrap();
        assert_eq!(drv.state(), MotorState::Brake);
        assert_eq!(drv.current_percent(), 0);
    }

    #[test]
    fn reverse_keeps_sign_in_state() {
        let mut drv = HBridgeDriver::new();
        drv.set_speed(-45).unwrap();
        assert_eq!(drv.current_percent(), -45);
    }
}
