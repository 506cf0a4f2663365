//! GPIO / peripheral pin assignments for the DriveBase main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers. Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Motor driver (DRV8871 H-bridge)
// ---------------------------------------------------------------------------

/// LEDC PWM output for motor speed control.
pub const MOTOR_PWM_GPIO: i32 = 1;
/// H-bridge input 1. IN1=H/IN2=L → forward.
pub const MOTOR_IN1_GPIO: i32 = 2;
/// H-bridge input 2. IN1=L/IN2=H → reverse; both high → brake.
pub const MOTOR_IN2_GPIO: i32 = 3;

// ---------------------------------------------------------------------------
// Speed feedback
// ---------------------------------------------------------------------------

/// Optical encoder pulse output — interrupt-driven, rising edge.
pub const ENCODER_PULSE_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Front-panel keys (active-low with external pull-ups)
// ---------------------------------------------------------------------------

/// Key GPIOs indexed by key id: [SPEED+, SPEED−, RUN/STOP].
pub const KEY_GPIOS: [i32; 3] = [15, 16, 21];

/// SPEED+ key id.
pub const KEY_SPEED_UP: u8 = 0;
/// SPEED− key id.
pub const KEY_SPEED_DOWN: u8 = 1;
/// RUN/STOP toggle key id.
pub const KEY_RUN_STOP: u8 = 2;

// ---------------------------------------------------------------------------
// UART debug
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 43;
pub const UART_RX_GPIO: i32 = 44;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits). 8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC base frequency for the motor (25 kHz — inaudible).
pub const MOTOR_PWM_FREQ_HZ: u32 = 25_000;
