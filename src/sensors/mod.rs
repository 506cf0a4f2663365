//! Sensor subsystem — speed feedback for the motor control loop.

pub mod encoder;
