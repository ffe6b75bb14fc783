//! Input routing
//!
//! Steps arrive in interrupt context and only ever touch single atomics:
//! the field index, the value under edit, or the pending preset index.
//! Button presses are handled in the main loop, where they may start or
//! stop modes and load presets.

use super::encoder::Step;
use super::fields::{Field, FieldKind, FIELD_COUNT};
use crate::profile::{validate_checkpoints, ProfileError, ProfileStore};
use crate::shared::SharedState;
use crate::state::{ModeError, ModeEvent, ModeSupervisor};

/// Result of handling one button press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonOutcome {
    /// Numeric or preset editing began on a field
    EditStarted(Field),
    /// Numeric edit left; `changed` when the value differs from edit entry
    EditFinished { field: Field, changed: bool },
    /// The edit broke the profile and was rolled back
    EditReverted { field: Field, error: ProfileError },
    /// Preset selector left and the preset copied into the active profile
    PresetLoaded { index: u8, changed: bool },
    /// A mode toggle took effect (or was a no-op)
    Mode(Option<ModeEvent>),
    /// A mode toggle was refused
    ModeRejected(ModeError),
}

/// Routes encoder steps and button presses to the shared state
#[derive(Clone, Copy)]
pub struct InputRouter<'a> {
    shared: &'a SharedState,
    preset_count: u8,
}

impl<'a> InputRouter<'a> {
    pub fn new(shared: &'a SharedState, preset_count: u8) -> Self {
        Self {
            shared,
            preset_count: preset_count.max(1),
        }
    }

    /// Handle one encoder step; safe to call from interrupt context
    ///
    /// Outside edit mode the selection moves, wrapping at both ends. In
    /// edit mode the selected value moves by one within its bounds.
    pub fn on_step(&self, step: Step) {
        let selection = &self.shared.selection;

        if !selection.is_editing() {
            let delta = step.direction.delta() as isize;
            let next = (selection.index() as isize + delta).rem_euclid(FIELD_COUNT as isize);
            selection.set_index(next as usize);
            selection.mark_highlight();
            return;
        }

        let descriptor = selection.field().descriptor();
        match descriptor.kind {
            FieldKind::PresetSelector => self.on_preset_field_step(step),
            _ => {
                if descriptor.step(self.shared, step.direction) {
                    selection.mark_highlight();
                }
            }
        }
    }

    /// Cycle the pending preset index; nothing is copied yet
    pub fn on_preset_field_step(&self, step: Step) {
        let selection = &self.shared.selection;
        let count = self.preset_count as i16;
        let next = (selection.preset_cursor() as i16 + step.direction.delta()).rem_euclid(count);
        selection.set_preset_cursor(next as u8);
        selection.mark_highlight();
    }

    /// Handle one button press in the main loop
    pub fn on_button_press(
        &self,
        supervisor: &mut ModeSupervisor,
        store: &ProfileStore,
    ) -> ButtonOutcome {
        let selection = &self.shared.selection;
        let descriptor = selection.field().descriptor();
        selection.mark_highlight();

        match descriptor.kind {
            FieldKind::ModeToggle(mode) => match supervisor.toggle(mode) {
                Ok(event) => {
                    if let Some(ModeEvent::Stopped(_)) = event {
                        selection.mark_curve();
                    }
                    ButtonOutcome::Mode(event)
                }
                Err(error) => ButtonOutcome::ModeRejected(error),
            },

            FieldKind::PresetSelector if !selection.is_editing() => {
                selection.set_preset_cursor(self.shared.profile.preset());
                selection.set_editing(true);
                ButtonOutcome::EditStarted(descriptor.field)
            }

            FieldKind::PresetSelector => {
                selection.set_editing(false);
                let before = self.shared.profile.snapshot();
                let index = match store.select(selection.preset_cursor(), &self.shared.profile) {
                    Some(_) => selection.preset_cursor(),
                    None => before.preset,
                };
                let changed = self.shared.profile.snapshot() != before;
                if changed {
                    selection.mark_curve();
                }
                ButtonOutcome::PresetLoaded { index, changed }
            }

            FieldKind::Parameter(_) | FieldKind::Setpoint(_) if !selection.is_editing() => {
                if let Some(value) = descriptor.value(self.shared) {
                    selection.set_edit_origin(value);
                }
                selection.set_editing(true);
                ButtonOutcome::EditStarted(descriptor.field)
            }

            FieldKind::Parameter(_) | FieldKind::Setpoint(_) => {
                selection.set_editing(false);
                let origin = selection.edit_origin();

                if let FieldKind::Parameter(_) = descriptor.kind {
                    if let Err(error) = validate_checkpoints(&self.shared.profile.checkpoints()) {
                        descriptor.write(self.shared, origin);
                        return ButtonOutcome::EditReverted {
                            field: descriptor.field,
                            error,
                        };
                    }
                }

                let changed = descriptor.value(self.shared) != Some(origin);
                if changed {
                    if let FieldKind::Parameter(_) = descriptor.kind {
                        selection.mark_curve();
                    }
                }
                ButtonOutcome::EditFinished {
                    field: descriptor.field,
                    changed,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ControlConfig, SetpointDefaults};
    use crate::input::Direction;
    use crate::profile::Param;
    use crate::shared::Setpoint;
    use crate::state::Mode;
    use proptest::prelude::*;

    struct Fixture {
        shared: SharedState,
        store: ProfileStore,
        supervisor: ModeSupervisor,
    }

    impl Fixture {
        fn new() -> Self {
            let shared = SharedState::new();
            let store = ProfileStore::default();
            store.select(0, &shared.profile);
            shared.setpoints.load(&SetpointDefaults::default());
            // Drain the startup signals
            shared.selection.take_curve();
            shared.selection.take_highlight();
            Self {
                shared,
                store,
                supervisor: ModeSupervisor::new(ControlConfig::default()),
            }
        }

        fn router(&self) -> InputRouter<'_> {
            InputRouter::new(&self.shared, self.store.len())
        }

        fn select(&self, field: Field) {
            self.shared.selection.set_index(field.index());
        }

        fn press(&mut self) -> ButtonOutcome {
            let router = InputRouter::new(&self.shared, self.store.len());
            router.on_button_press(&mut self.supervisor, &self.store)
        }
    }

    #[test]
    fn test_navigation_wraps() {
        let f = Fixture::new();
        f.select(Field::Preset);
        f.router().on_step(Step::CW);
        assert_eq!(f.shared.selection.field(), Field::PreheatTemp);

        f.router().on_step(Step::CCW);
        assert_eq!(f.shared.selection.field(), Field::Preset);
        assert!(f.shared.selection.take_highlight());
    }

    #[test]
    fn test_two_presses_without_step_change_nothing() {
        let mut f = Fixture::new();
        f.select(Field::SoakTemp);

        assert_eq!(f.press(), ButtonOutcome::EditStarted(Field::SoakTemp));
        assert_eq!(
            f.press(),
            ButtonOutcome::EditFinished {
                field: Field::SoakTemp,
                changed: false
            }
        );
        assert_eq!(f.shared.profile.get(Param::SoakTemp), 130);
        assert!(!f.shared.selection.take_curve());
    }

    #[test]
    fn test_edit_marks_curve_dirty() {
        let mut f = Fixture::new();
        f.select(Field::ReflowTemp);
        f.press();
        f.router().on_step(Step::CW);
        f.router().on_step(Step::CW);

        assert_eq!(
            f.press(),
            ButtonOutcome::EditFinished {
                field: Field::ReflowTemp,
                changed: true
            }
        );
        assert_eq!(f.shared.profile.get(Param::ReflowTemp), 167);
        assert!(f.shared.selection.take_curve());
    }

    #[test]
    fn test_step_back_to_origin_is_unchanged() {
        let mut f = Fixture::new();
        f.select(Field::ReflowTemp);
        f.press();
        f.router().on_step(Step::CW);
        f.router().on_step(Step::CCW);
        assert_eq!(
            f.press(),
            ButtonOutcome::EditFinished {
                field: Field::ReflowTemp,
                changed: false
            }
        );
    }

    #[test]
    fn test_setpoint_edit_leaves_curve() {
        let mut f = Fixture::new();
        f.select(Field::FreeHeatingTarget);
        f.press();
        f.router().on_step(Step::CCW);
        f.press();

        assert_eq!(f.shared.setpoints.get(Setpoint::FreeHeating), 199);
        assert!(!f.shared.selection.take_curve());
    }

    #[test]
    fn test_broken_profile_reverted() {
        let mut f = Fixture::new();
        f.select(Field::SoakTime);
        f.press();
        // Neighbour moved underneath the edit, outside the router
        f.shared.profile.set(Param::SoakTime, 95);
        f.shared.profile.set(Param::PreheatTime, 95);

        assert_eq!(
            f.press(),
            ButtonOutcome::EditReverted {
                field: Field::SoakTime,
                error: ProfileError::OrderViolation
            }
        );
        assert_eq!(f.shared.profile.get(Param::SoakTime), 180);
    }

    #[test]
    fn test_preset_copied_on_leave() {
        let mut f = Fixture::new();
        f.select(Field::Preset);
        assert_eq!(f.press(), ButtonOutcome::EditStarted(Field::Preset));

        f.router().on_step(Step::CW);
        f.router().on_step(Step::CW);
        // Nothing copied while cycling
        assert_eq!(f.shared.profile.preset(), 0);
        assert_eq!(f.shared.selection.preset_cursor(), 2);

        assert_eq!(
            f.press(),
            ButtonOutcome::PresetLoaded {
                index: 2,
                changed: true
            }
        );
        assert_eq!(f.shared.profile.get(Param::PreheatTime), 30);
        assert_eq!(f.shared.profile.preheat_cutoff_s(), 15);
        assert!(f.shared.selection.take_curve());
    }

    #[test]
    fn test_preset_cursor_wraps() {
        let mut f = Fixture::new();
        f.select(Field::Preset);
        f.press();
        f.router().on_step(Step::CCW);
        assert_eq!(f.shared.selection.preset_cursor(), 3);
        f.router().on_step(Step::CW);
        assert_eq!(f.shared.selection.preset_cursor(), 0);
    }

    #[test]
    fn test_reselect_restores_edited_value() {
        let mut f = Fixture::new();
        f.select(Field::PreheatTemp);
        f.press();
        for _ in 0..5 {
            f.router().on_step(Step::CW);
        }
        f.press();
        assert_eq!(f.shared.profile.get(Param::PreheatTemp), 95);

        f.select(Field::Preset);
        f.press();
        assert_eq!(
            f.press(),
            ButtonOutcome::PresetLoaded {
                index: 0,
                changed: true
            }
        );
        assert_eq!(f.shared.profile.get(Param::PreheatTemp), 90);
    }

    #[test]
    fn test_mode_toggle_does_not_enter_edit() {
        let mut f = Fixture::new();
        f.select(Field::ReflowToggle);

        assert_eq!(
            f.press(),
            ButtonOutcome::Mode(Some(ModeEvent::Started(Mode::Reflow)))
        );
        assert!(!f.shared.selection.is_editing());

        assert_eq!(
            f.press(),
            ButtonOutcome::Mode(Some(ModeEvent::Stopped(Mode::Reflow)))
        );
        assert!(f.shared.selection.take_curve());
    }

    #[test]
    fn test_second_mode_rejected_through_router() {
        let mut f = Fixture::new();
        f.select(Field::ReflowToggle);
        f.press();

        // Navigate two fields on to the free-heating toggle
        f.router().on_step(Step::CW);
        f.router().on_step(Step::CW);
        assert_eq!(f.shared.selection.field(), Field::FreeHeatingToggle);

        assert_eq!(
            f.press(),
            ButtonOutcome::ModeRejected(ModeError::Busy {
                active: Mode::Reflow,
                requested: Mode::FreeHeating
            })
        );
        assert_eq!(f.supervisor.mode(), Mode::Reflow);
    }

    proptest! {
        #[test]
        fn prop_navigation_is_cyclic(start in 0usize..FIELD_COUNT, steps in 0usize..64, cw in any::<bool>()) {
            let f = Fixture::new();
            f.shared.selection.set_index(start);
            let step = if cw { Step::CW } else { Step::CCW };
            for _ in 0..steps {
                f.router().on_step(step);
            }

            let delta = if cw { steps as isize } else { -(steps as isize) };
            let expected = (start as isize + delta).rem_euclid(FIELD_COUNT as isize) as usize;
            prop_assert_eq!(f.shared.selection.index(), expected);
        }

        #[test]
        fn prop_edit_stays_in_bounds(index in 0usize..8, cw in any::<bool>()) {
            let mut f = Fixture::new();
            let field = Field::ALL[index];
            f.select(field);
            f.press();
            let direction = if cw { Direction::Cw } else { Direction::Ccw };
            for _ in 0..1000 {
                f.router().on_step(Step { direction });
            }
            let outcome = f.press();
            prop_assert!(
                matches!(outcome, ButtonOutcome::EditFinished { .. }),
                "unexpected {:?}",
                outcome
            );

            let desc = field.descriptor();
            let value = desc.value(&f.shared).unwrap_or(i16::MIN);
            prop_assert!(value >= desc.min && value <= desc.max);
            prop_assert!(validate_checkpoints(&f.shared.profile.checkpoints()).is_ok());
        }
    }
}
