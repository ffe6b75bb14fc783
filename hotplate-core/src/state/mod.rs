//! Operating mode supervision
//!
//! Arbitrates which mode drives the thermal process. Transitions are a pure
//! function of the current mode and a request.

pub mod events;
pub mod machine;

pub use events::{ModeError, ModeEvent, ModeRequest};
pub use machine::{Mode, ModeSupervisor};
