//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the drivebase system:
//! key-panel interpretation, target-speed management, and closed-loop
//! PID speed control.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
