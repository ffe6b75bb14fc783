//! Mode requests, events and errors

use super::machine::Mode;
use crate::process::Phase;

/// Requests that drive mode transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeRequest {
    /// Operator pressed the start/stop field of a mode
    Toggle(Mode),
    /// Stop whatever is running
    Stop,
    /// The running program completed on its own
    Finish,
}

/// What happened as a result of a request or a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeEvent {
    Started(Mode),
    Stopped(Mode),
    /// Reflow cooled down and returned to idle
    Finished(Mode),
    PhaseChanged(Phase),
}

/// Rejected mode request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeError {
    /// A different mode is already running
    Busy { active: Mode, requested: Mode },
}
