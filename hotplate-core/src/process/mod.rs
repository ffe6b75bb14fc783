//! Thermal process control
//!
//! Phase tracking, target interpolation and heater duty decisions.

pub mod open_loop;
pub mod phase;
pub mod thermal;

pub use open_loop::{OpenLoopHeater, OpenLoopStage};
pub use phase::Phase;
pub use thermal::{ramp_duty, segment_target, ProcessEvent, ProcessState, ThermalProcess, TickInput};
