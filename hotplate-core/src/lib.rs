//! Board-agnostic control core for the reflow hotplate firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware collaborator traits (temperature source, heater, fan, display)
//! - Rotary encoder decoding and the field/edit input router
//! - Thermal profile presets and the editable active profile
//! - The reflow phase machine and the open-loop heating programs
//! - Mode supervision (reflow, free heating, free cooling, warm-up)
//! - Sensor fault handling
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod input;
pub mod process;
pub mod profile;
pub mod safety;
pub mod shared;
pub mod state;
pub mod traits;

pub use controller::{Controller, PollReport, TickReport};
pub use shared::SharedState;
