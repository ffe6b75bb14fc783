//! Safety checks
//!
//! Detects implausible sensor data before it reaches the control loop.

pub mod monitor;

pub use monitor::{Reading, SensorGuard};
