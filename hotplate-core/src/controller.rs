//! Main-loop controller
//!
//! The controller is the cooperative half of the system:
//! - Consumes the latched button press
//! - Pushes selection and curve updates to the display
//! - Runs the control tick at a fixed period
//! - Writes the heater and fan outputs
//!
//! Encoder steps are handled elsewhere, in interrupt context, through the
//! [`InputRouter`] returned by [`Controller::router`].

use crate::config::ControlConfig;
use crate::input::{ButtonOutcome, FieldKind, InputRouter};
use crate::profile::ProfileStore;
use crate::safety::SensorGuard;
use crate::shared::SharedState;
use crate::state::{Mode, ModeEvent, ModeSupervisor};
use crate::traits::{
    DisplaySink, FanActuator, FieldValue, HeaterActuator, SelectionView, StatusFrame,
    TemperatureSource,
};

/// Result of one control tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    pub status: StatusFrame,
    pub event: Option<ModeEvent>,
}

/// What one pass of the main loop did
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollReport {
    /// Outcome of a consumed button press
    pub button: Option<ButtonOutcome>,
    /// Present when the tick period elapsed and the control step ran
    pub tick: Option<TickReport>,
}

/// Coordinates input, mode supervision and the control tick
pub struct Controller<'a, T, H, F, D> {
    shared: &'a SharedState,
    store: ProfileStore,
    supervisor: ModeSupervisor,
    guard: SensorGuard,
    tick_period_ms: u32,
    last_tick_ms: u32,
    sensor: T,
    heater: H,
    fan: F,
    display: D,
}

impl<'a, T, H, F, D> Controller<'a, T, H, F, D>
where
    T: TemperatureSource,
    H: HeaterActuator,
    F: FanActuator,
    D: DisplaySink,
{
    /// Create a controller and load the first preset
    ///
    /// Outputs are driven off and the display is scheduled for a full
    /// redraw on the first poll.
    pub fn new(
        shared: &'a SharedState,
        store: ProfileStore,
        config: ControlConfig,
        sensor: T,
        mut heater: H,
        mut fan: F,
        display: D,
    ) -> Self {
        shared.profile.set_lead_time(config.lead_time_s);
        store.select(0, &shared.profile);
        shared.setpoints.load(&config.setpoints);
        shared.selection.mark_highlight();
        shared.selection.mark_curve();

        heater.set_duty(0);
        fan.set_on(false);

        Self {
            shared,
            store,
            supervisor: ModeSupervisor::new(config),
            guard: SensorGuard::from_config(&config),
            tick_period_ms: config.tick_period_ms,
            last_tick_ms: 0,
            sensor,
            heater,
            fan,
            display,
        }
    }

    /// Router for the interrupt-context encoder handler
    pub fn router(&self) -> InputRouter<'a> {
        InputRouter::new(self.shared, self.store.len())
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn supervisor(&self) -> &ModeSupervisor {
        &self.supervisor
    }

    pub fn heater(&self) -> &H {
        &self.heater
    }

    pub fn fan(&self) -> &F {
        &self.fan
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// One pass of the main loop
    ///
    /// `now_ms` is a free-running millisecond counter; wrap-around is
    /// handled.
    pub fn poll(&mut self, now_ms: u32) -> PollReport {
        let mut report = PollReport::default();
        let shared = self.shared;
        let selection = &shared.selection;

        if selection.take_press() {
            let outcome = self
                .router()
                .on_button_press(&mut self.supervisor, &self.store);
            if let ButtonOutcome::Mode(Some(_)) = outcome {
                self.apply_outputs();
            }
            report.button = Some(outcome);
        }

        if selection.take_highlight() {
            let view = self.selection_view();
            self.display.show_selection(&view);
        }

        if selection.take_curve() {
            let snapshot = self.shared.profile.snapshot();
            let name = self.store.get(snapshot.preset).map_or("", |p| p.name);
            self.display.redraw_curve(&snapshot, name);
        }

        if now_ms.wrapping_sub(self.last_tick_ms) > self.tick_period_ms {
            self.last_tick_ms = now_ms;
            report.tick = Some(self.tick());
        }

        report
    }

    fn tick(&mut self) -> TickReport {
        let reading = self.guard.filter(self.sensor.read());

        let event = self.supervisor.tick(self.shared, reading);
        if let Some(ModeEvent::Finished(_)) = event {
            self.shared.selection.mark_curve();
            self.shared.selection.mark_highlight();
        }

        self.apply_outputs();

        let state = self.supervisor.state();
        let status = StatusFrame {
            mode: self.supervisor.mode(),
            phase: state.phase,
            stage: state.stage,
            elapsed_s: state.elapsed_s,
            target_c: state.target_c,
            measured_c: reading.celsius,
            duty: state.duty,
            fan_on: state.fan_on,
            sensor_fault: reading.fault,
        };
        self.display.show_status(&status);

        TickReport { status, event }
    }

    fn apply_outputs(&mut self) {
        let state = self.supervisor.state();
        self.heater.set_duty(state.duty);
        self.fan.set_on(state.fan_on);
    }

    /// Current selection as the display should show it
    pub fn selection_view(&self) -> SelectionView {
        let selection = &self.shared.selection;
        let descriptor = selection.field().descriptor();
        let editing = selection.is_editing();

        let value = match descriptor.kind {
            FieldKind::Parameter(_) | FieldKind::Setpoint(_) => {
                FieldValue::Number(descriptor.value(self.shared).unwrap_or(0))
            }
            FieldKind::ModeToggle(mode) => FieldValue::Toggle {
                running: mode != Mode::Idle && self.supervisor.mode() == mode,
            },
            FieldKind::PresetSelector => {
                let index = if editing {
                    selection.preset_cursor()
                } else {
                    self.shared.profile.preset()
                };
                FieldValue::Preset {
                    index,
                    name: self.store.get(index).map_or("", |p| p.name),
                }
            }
        };

        SelectionView {
            field: descriptor.field,
            label: descriptor.label,
            editing,
            value,
        }
    }
}
