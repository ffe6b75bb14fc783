//! Field descriptor table
//!
//! Every selectable field is described once: its label, what it is bound
//! to, and its static clamp range. The router and the display both work
//! from this table.

use super::encoder::Direction;
use crate::profile::Param;
use crate::shared::{Setpoint, SharedState};
use crate::state::Mode;

/// Number of selectable fields
pub const FIELD_COUNT: usize = 16;

/// Selectable field, in navigation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    PreheatTemp,
    PreheatTime,
    SoakTemp,
    SoakTime,
    ReflowTemp,
    ReflowTime,
    HoldTemp,
    HoldTime,
    WarmupTarget,
    WarmupToggle,
    ReflowToggle,
    FreeHeatingTarget,
    FreeHeatingToggle,
    FreeCoolingTarget,
    FreeCoolingToggle,
    Preset,
}

impl Field {
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::PreheatTemp,
        Field::PreheatTime,
        Field::SoakTemp,
        Field::SoakTime,
        Field::ReflowTemp,
        Field::ReflowTime,
        Field::HoldTemp,
        Field::HoldTime,
        Field::WarmupTarget,
        Field::WarmupToggle,
        Field::ReflowToggle,
        Field::FreeHeatingTarget,
        Field::FreeHeatingToggle,
        Field::FreeCoolingTarget,
        Field::FreeCoolingToggle,
        Field::Preset,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn descriptor(self) -> &'static FieldDescriptor {
        &FIELDS[self.index()]
    }
}

/// What a field is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldKind {
    /// One of the eight active-profile parameters
    Parameter(Param),
    /// Target of an open-loop mode
    Setpoint(Setpoint),
    /// Starts or stops a mode when pressed
    ModeToggle(Mode),
    /// Cycles through the preset table
    PresetSelector,
}

/// Static description of one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub field: Field,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Lowest value stepping may reach
    pub min: i16,
    /// Highest value stepping may reach
    pub max: i16,
}

const fn param(field: Field, label: &'static str, p: Param, min: i16, max: i16) -> FieldDescriptor {
    FieldDescriptor {
        field,
        label,
        kind: FieldKind::Parameter(p),
        min,
        max,
    }
}

const fn setpoint(
    field: Field,
    label: &'static str,
    s: Setpoint,
    min: i16,
    max: i16,
) -> FieldDescriptor {
    FieldDescriptor {
        field,
        label,
        kind: FieldKind::Setpoint(s),
        min,
        max,
    }
}

const fn toggle(field: Field, label: &'static str, mode: Mode) -> FieldDescriptor {
    FieldDescriptor {
        field,
        label,
        kind: FieldKind::ModeToggle(mode),
        min: 0,
        max: 0,
    }
}

/// The field table, indexed by [`Field::index`]
pub static FIELDS: [FieldDescriptor; FIELD_COUNT] = [
    param(Field::PreheatTemp, "Preheat temp", Param::PreheatTemp, 20, 150),
    param(Field::PreheatTime, "Preheat time", Param::PreheatTime, 0, 90),
    param(Field::SoakTemp, "Soak temp", Param::SoakTemp, 20, 180),
    param(Field::SoakTime, "Soak time", Param::SoakTime, 0, 180),
    param(Field::ReflowTemp, "Reflow temp", Param::ReflowTemp, 0, 250),
    param(Field::ReflowTime, "Reflow time", Param::ReflowTime, 0, 240),
    param(Field::HoldTemp, "Hold temp", Param::HoldTemp, 0, 250),
    param(Field::HoldTime, "Hold time", Param::HoldTime, 0, 250),
    setpoint(Field::WarmupTarget, "Warmup temp", Setpoint::Warmup, 20, 60),
    toggle(Field::WarmupToggle, "Warmup", Mode::Warmup),
    toggle(Field::ReflowToggle, "Reflow", Mode::Reflow),
    setpoint(
        Field::FreeHeatingTarget,
        "Heating temp",
        Setpoint::FreeHeating,
        20,
        300,
    ),
    toggle(Field::FreeHeatingToggle, "Heating", Mode::FreeHeating),
    setpoint(
        Field::FreeCoolingTarget,
        "Cooling temp",
        Setpoint::FreeCooling,
        20,
        200,
    ),
    toggle(Field::FreeCoolingToggle, "Cooling", Mode::FreeCooling),
    FieldDescriptor {
        field: Field::Preset,
        label: "Paste",
        kind: FieldKind::PresetSelector,
        min: 0,
        max: 0,
    },
];

impl FieldDescriptor {
    /// True for fields that hold a number stepped in place
    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, FieldKind::Parameter(_) | FieldKind::Setpoint(_))
    }

    /// Current value of a numeric field
    pub fn value(&self, shared: &SharedState) -> Option<i16> {
        match self.kind {
            FieldKind::Parameter(p) => Some(shared.profile.get(p)),
            FieldKind::Setpoint(s) => Some(shared.setpoints.get(s)),
            FieldKind::ModeToggle(_) | FieldKind::PresetSelector => None,
        }
    }

    /// Overwrite a numeric field without clamping
    pub fn write(&self, shared: &SharedState, value: i16) {
        match self.kind {
            FieldKind::Parameter(p) => shared.profile.set(p, value),
            FieldKind::Setpoint(s) => shared.setpoints.set(s, value),
            FieldKind::ModeToggle(_) | FieldKind::PresetSelector => {}
        }
    }

    /// Effective clamp range: the static range narrowed by the neighbouring
    /// checkpoint times
    ///
    /// `None` when the range is empty, in which case the value is frozen.
    pub fn bounds(&self, shared: &SharedState) -> Option<(i16, i16)> {
        let (lo, hi) = match self.kind {
            FieldKind::Parameter(p) => {
                let (nlo, nhi) = shared.profile.neighbour_bounds(p);
                (self.min.max(nlo), self.max.min(nhi))
            }
            FieldKind::Setpoint(_) => (self.min, self.max),
            FieldKind::ModeToggle(_) | FieldKind::PresetSelector => return None,
        };
        (lo <= hi).then_some((lo, hi))
    }

    /// Step a numeric field by one, clamped to [`bounds`](Self::bounds)
    ///
    /// Returns true if the stored value changed.
    pub fn step(&self, shared: &SharedState, direction: Direction) -> bool {
        let (Some(current), Some((lo, hi))) = (self.value(shared), self.bounds(shared)) else {
            return false;
        };
        let next = current.saturating_add(direction.delta()).clamp(lo, hi);
        if next == current {
            return false;
        }
        self.write(shared, next);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SetpointDefaults, DEFAULT_PRESETS};
    use proptest::prelude::*;

    fn loaded(preset: usize) -> SharedState {
        let shared = SharedState::new();
        shared.profile.load(preset as u8, &DEFAULT_PRESETS[preset]);
        shared.setpoints.load(&SetpointDefaults::default());
        shared
    }

    #[test]
    fn test_table_matches_field_order() {
        for (i, desc) in FIELDS.iter().enumerate() {
            assert_eq!(desc.field.index(), i);
            assert_eq!(Field::ALL[i], desc.field);
        }
    }

    #[test]
    fn test_parameter_fields_map_to_params() {
        for p in Param::ALL {
            assert_eq!(FIELDS[p.index()].kind, FieldKind::Parameter(p));
        }
    }

    #[test]
    fn test_step_clamps_at_static_max() {
        let shared = loaded(0);
        let field = Field::PreheatTemp.descriptor();
        shared.profile.set(Param::PreheatTemp, 150);

        assert!(!field.step(&shared, Direction::Cw));
        assert_eq!(shared.profile.get(Param::PreheatTemp), 150);

        assert!(field.step(&shared, Direction::Ccw));
        assert_eq!(shared.profile.get(Param::PreheatTemp), 149);
    }

    #[test]
    fn test_time_clamped_by_neighbour() {
        // Sn42: soak 180 s, reflow 240 s
        let shared = loaded(0);
        let field = Field::ReflowTime.descriptor();
        assert_eq!(field.bounds(&shared), Some((181, 240)));

        shared.profile.set(Param::SoakTime, 170);
        let soak = Field::SoakTime.descriptor();
        assert_eq!(soak.bounds(&shared), Some((91, 180)));
    }

    #[test]
    fn test_setpoint_step() {
        let shared = loaded(0);
        let field = Field::WarmupTarget.descriptor();
        assert!(field.step(&shared, Direction::Cw));
        assert_eq!(shared.setpoints.get(Setpoint::Warmup), 39);
    }

    #[test]
    fn test_toggle_has_no_value() {
        let shared = loaded(0);
        let field = Field::ReflowToggle.descriptor();
        assert_eq!(field.value(&shared), None);
        assert!(!field.step(&shared, Direction::Cw));
    }

    proptest! {
        #[test]
        fn prop_steps_stay_in_bounds(
            index in 0usize..FIELD_COUNT,
            preset in 0usize..4,
            cw in any::<bool>(),
        ) {
            let shared = loaded(preset);
            let desc = &FIELDS[index];
            let direction = if cw { Direction::Cw } else { Direction::Ccw };

            for _ in 0..1000 {
                desc.step(&shared, direction);
            }

            if let Some(value) = desc.value(&shared) {
                prop_assert!(value >= desc.min && value <= desc.max);
                prop_assert!(shared.profile.snapshot().checkpoints.windows(2)
                    .all(|w| w[0].time_s < w[1].time_s));
            }
        }
    }
}
