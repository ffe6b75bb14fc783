//! Shared state and inter-task signals
//!
//! The control core's shared state is a plain static: every field is an
//! atomic, so the encoder and sensor tasks write it without a lock. Display
//! frames go through signals; a slow renderer only ever sees the newest.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use hotplate_core::profile::ProfileSnapshot;
use hotplate_core::traits::{SelectionView, StatusFrame};
use hotplate_core::SharedState;

/// Selection, active profile, setpoints and the latest temperature
pub static SHARED: SharedState = SharedState::new();

/// Process status, once per control tick
pub static STATUS: Signal<CriticalSectionRawMutex, StatusFrame> = Signal::new();

/// Highlight and value of the selected field
pub static SELECTION: Signal<CriticalSectionRawMutex, SelectionView> = Signal::new();

/// Curve redraw request with the preset name
pub static CURVE: Signal<CriticalSectionRawMutex, (ProfileSnapshot, &'static str)> =
    Signal::new();
