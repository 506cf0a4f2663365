//! Unified error types for the drivebase firmware.
//!
//! A single `Error` enum that every fallible subsystem converts into,
//! keeping the top-level control loop's error handling uniform.  All
//! variants are `Copy` so they can be cheaply passed through the control
//! loop without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An actuator command failed.
    Actuator(ActuatorError),
    /// Peripheral initialisation failed.
    Init(InitError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Init(e) => write!(f, "init: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// GPIO set failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Peripheral initialisation errors
// ---------------------------------------------------------------------------

/// Errors during one-shot peripheral initialisation.  The `i32` payloads
/// carry the raw ESP-IDF return code for the boot log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    GpioConfigFailed(i32),
    LedcInitFailed,
    IsrInstallFailed(i32),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed => write!(f, "LEDC timer/channel config failed"),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

impl From<InitError> for Error {
    fn from(e: InitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_preserve_the_variant() {
        let e: Error = ActuatorError::PwmWriteFailed.into();
        assert_eq!(e, Error::Actuator(ActuatorError::PwmWriteFailed));

        let e: Error = InitError::GpioConfigFailed(-1).into();
        assert_eq!(e, Error::Init(InitError::GpioConfigFailed(-1)));
    }

    #[test]
    fn display_includes_the_subsystem_and_return_code() {
        let e = Error::Init(InitError::IsrInstallFailed(259));
        assert_eq!(e.to_string(), "init: GPIO ISR service install failed (rc=259)");

        let e = Error::Actuator(ActuatorError::GpioWriteFailed);
        assert_eq!(e.to_string(), "actuator: GPIO write failed");
    }
}
