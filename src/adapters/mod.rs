//! Driven adapters — the outer ring of the hexagon.
//!
//! Each adapter implements one or more port traits from
//! [`crate::app::ports`], translating domain calls into peripheral
//! operations (or logging).

pub mod hardware;
pub mod log_sink;
pub mod time;
