//! Display hand-off
//!
//! The controller renders nothing itself. [`SignalDisplay`] forwards each
//! frame to the display task, which owns the panel.

use hotplate_core::profile::ProfileSnapshot;
use hotplate_core::traits::{DisplaySink, SelectionView, StatusFrame};

use crate::channels::{CURVE, SELECTION, STATUS};

/// Display sink that posts frames to the display task
pub struct SignalDisplay;

impl DisplaySink for SignalDisplay {
    fn show_status(&mut self, status: &StatusFrame) {
        STATUS.signal(*status);
    }

    fn show_selection(&mut self, selection: &SelectionView) {
        SELECTION.signal(*selection);
    }

    fn redraw_curve(&mut self, profile: &ProfileSnapshot, name: &'static str) {
        CURVE.signal((*profile, name));
    }
}
