//! Field selection and edit state

use portable_atomic::{AtomicBool, AtomicI16, AtomicU8, Ordering};

use super::fields::{Field, FIELD_COUNT};

/// Cursor position, edit flag and the signals raised for the main loop
///
/// The encoder interrupt moves the cursor and sets `highlight_dirty`; the
/// button interrupt sets `button`. The main loop consumes both.
pub struct Selection {
    field: AtomicU8,
    edit_mode: AtomicBool,
    edit_origin: AtomicI16,
    preset_cursor: AtomicU8,
    button: AtomicBool,
    highlight_dirty: AtomicBool,
    curve_dirty: AtomicBool,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    pub const fn new() -> Self {
        Self {
            field: AtomicU8::new(0),
            edit_mode: AtomicBool::new(false),
            edit_origin: AtomicI16::new(0),
            preset_cursor: AtomicU8::new(0),
            button: AtomicBool::new(false),
            highlight_dirty: AtomicBool::new(true),
            curve_dirty: AtomicBool::new(true),
        }
    }

    /// Index of the selected field
    pub fn index(&self) -> usize {
        (self.field.load(Ordering::Acquire) as usize).min(FIELD_COUNT - 1)
    }

    pub fn field(&self) -> Field {
        Field::ALL[self.index()]
    }

    pub(crate) fn set_index(&self, index: usize) {
        self.field.store((index % FIELD_COUNT) as u8, Ordering::Release);
    }

    pub fn is_editing(&self) -> bool {
        self.edit_mode.load(Ordering::Acquire)
    }

    pub(crate) fn set_editing(&self, editing: bool) {
        self.edit_mode.store(editing, Ordering::Release);
    }

    /// Value recorded when edit mode was entered
    pub fn edit_origin(&self) -> i16 {
        self.edit_origin.load(Ordering::Acquire)
    }

    pub(crate) fn set_edit_origin(&self, value: i16) {
        self.edit_origin.store(value, Ordering::Release);
    }

    /// Preset index under the cursor while the preset selector is edited
    pub fn preset_cursor(&self) -> u8 {
        self.preset_cursor.load(Ordering::Acquire)
    }

    pub(crate) fn set_preset_cursor(&self, index: u8) {
        self.preset_cursor.store(index, Ordering::Release);
    }

    /// Latch a button press; called from the button edge handler
    pub fn latch_press(&self) {
        self.button.store(true, Ordering::Release);
    }

    /// Consume a latched press
    ///
    /// The latch is cleared before the press is handled, so a press that
    /// lands while the handler runs is seen on the next loop iteration.
    pub fn take_press(&self) -> bool {
        self.button.swap(false, Ordering::AcqRel)
    }

    pub fn mark_highlight(&self) {
        self.highlight_dirty.store(true, Ordering::Release);
    }

    pub fn take_highlight(&self) -> bool {
        self.highlight_dirty.swap(false, Ordering::AcqRel)
    }

    /// Raise the profile-dirty signal
    pub fn mark_curve(&self) {
        self.curve_dirty.store(true, Ordering::Release);
    }

    pub fn take_curve(&self) -> bool {
        self.curve_dirty.swap(false, Ordering::AcqRel)
    }
}
