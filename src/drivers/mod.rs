//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod button;
pub mod hbridge;
pub mod hw_init;
pub mod hw_timer;
