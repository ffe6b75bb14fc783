//! Display sink trait
//!
//! The controller pushes plain data; layout, fonts and curve plotting are
//! left to the implementation.

use crate::input::Field;
use crate::process::{OpenLoopStage, Phase};
use crate::profile::ProfileSnapshot;
use crate::state::Mode;

/// Process status pushed once per control tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusFrame {
    pub mode: Mode,
    pub phase: Phase,
    pub stage: Option<OpenLoopStage>,
    pub elapsed_s: f32,
    pub target_c: f32,
    pub measured_c: f32,
    pub duty: u8,
    pub fan_on: bool,
    /// The measured value is a fallback after a sensor fault
    pub sensor_fault: bool,
}

/// What the selected field currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldValue {
    Number(i16),
    /// Preset under the cursor (pending while editing)
    Preset { index: u8, name: &'static str },
    /// Start/stop field; `running` when its mode is active
    Toggle { running: bool },
}

/// Selection and edit state for highlighting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SelectionView {
    pub field: Field,
    pub label: &'static str,
    pub editing: bool,
    pub value: FieldValue,
}

/// Rendering collaborator
pub trait DisplaySink {
    /// Show the process status
    fn show_status(&mut self, status: &StatusFrame);

    /// Move the highlight and show the selected value
    fn show_selection(&mut self, selection: &SelectionView);

    /// Redraw the profile curve from its numeric points
    fn redraw_curve(&mut self, profile: &ProfileSnapshot, name: &'static str);
}
