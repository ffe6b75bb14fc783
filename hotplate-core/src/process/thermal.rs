//! Thermal process
//!
//! Turns elapsed time and measured temperature into a heater duty and fan
//! request once per control tick. A run follows either the active profile
//! through its phases, an open-loop setpoint program, or runs the fan only.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::open_loop::{OpenLoopHeater, OpenLoopStage};
use super::phase::Phase;
use crate::config::{ControlConfig, OpenLoopConfig};
use crate::profile::{Checkpoint, ProfileSnapshot};

/// Observable state of the process
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProcessState {
    /// Profile phase, `Idle` for open-loop runs
    pub phase: Phase,
    /// Open-loop stage while an open-loop program runs
    pub stage: Option<OpenLoopStage>,
    /// Seconds since the run started
    pub elapsed_s: f32,
    /// Target temperature (°C)
    pub target_c: f32,
    /// Last measured temperature (°C)
    pub measured_c: f32,
    /// Heater duty, 0..=255
    pub duty: u8,
    /// Fan request
    pub fan_on: bool,
}

/// Inputs of one control tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Measured plate temperature (°C)
    pub measured_c: f32,
    /// Active profile as of this tick
    pub profile: ProfileSnapshot,
    /// Setpoint of the running open-loop mode (°C)
    pub setpoint_c: f32,
    /// `measured_c` is a fallback, not a real reading
    pub sensor_fault: bool,
}

/// Something the caller should know about after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProcessEvent {
    /// The profile moved to a new phase
    PhaseChanged(Phase),
    /// Cooling completed; the process is idle again
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Program {
    Idle,
    Profile,
    OpenLoop(OpenLoopHeater),
    FanOnly,
}

/// Heater and fan decision maker
#[derive(Debug, Clone)]
pub struct ThermalProcess {
    config: ControlConfig,
    program: Program,
    state: ProcessState,
}

impl ThermalProcess {
    pub fn new(config: ControlConfig) -> Self {
        Self {
            config,
            program: Program::Idle,
            state: ProcessState::default(),
        }
    }

    pub fn state(&self) -> &ProcessState {
        &self.state
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.program != Program::Idle
    }

    /// Start following the active profile from preheat
    pub fn start_profile(&mut self) {
        self.reset(Program::Profile);
        self.state.phase = Phase::Preheat;
        self.state.target_c = self.config.ambient_c;
    }

    /// Start an open-loop setpoint program
    pub fn start_open_loop(&mut self, config: OpenLoopConfig) {
        let heater = OpenLoopHeater::new(config);
        self.reset(Program::OpenLoop(heater));
        self.state.stage = Some(heater.stage());
    }

    /// Start a fan-only cool-down towards the setpoint
    pub fn start_fan_only(&mut self) {
        self.reset(Program::FanOnly);
    }

    /// Heater off, fan off, back to idle
    pub fn stop(&mut self) {
        self.reset(Program::Idle);
    }

    /// Run one control step
    ///
    /// On a sensor fault the heater is off for the tick and no phase or
    /// stage transition happens; the fan logic still runs.
    pub fn tick(&mut self, input: &TickInput) -> Option<ProcessEvent> {
        self.state.measured_c = input.measured_c;

        let event = match self.program {
            Program::Idle => return None,
            Program::Profile => self.tick_profile(input),
            Program::OpenLoop(mut heater) => {
                self.state.target_c = input.setpoint_c;
                self.state.fan_on = false;
                if !input.sensor_fault {
                    self.state.duty = heater.update(input.setpoint_c, input.measured_c);
                    self.state.stage = Some(heater.stage());
                    self.program = Program::OpenLoop(heater);
                }
                None
            }
            Program::FanOnly => {
                self.state.target_c = input.setpoint_c;
                self.state.duty = 0;
                self.state.fan_on = input.measured_c > input.setpoint_c;
                None
            }
        };

        if input.sensor_fault {
            self.state.duty = 0;
        }
        if self.program != Program::Idle {
            self.state.elapsed_s += self.config.tick_period_s();
        }
        event
    }

    fn tick_profile(&mut self, input: &TickInput) -> Option<ProcessEvent> {
        let config = &self.config;
        let state = &mut self.state;
        let measured = input.measured_c;
        let mut event = None;

        if state.phase.is_heating() && state.elapsed_s >= config.max_run_s {
            state.phase = Phase::Cooling;
            event = Some(ProcessEvent::PhaseChanged(Phase::Cooling));
        }

        if let Some(target) = segment_target(
            state.phase,
            state.elapsed_s,
            &input.profile,
            config.ambient_c,
        ) {
            state.target_c = target;
            state.fan_on = false;
            state.duty = match state.phase {
                Phase::Preheat => {
                    ramp_duty(config, state.elapsed_s, input.profile.preheat_cutoff_s, measured, target)
                }
                Phase::Reflow => {
                    ramp_duty(config, state.elapsed_s, input.profile.reflow_cutoff_s, measured, target)
                }
                Phase::Soak if measured < target => config.soak_duty,
                Phase::Hold if measured < target => config.hold_duty,
                _ => 0,
            };

            if input.sensor_fault {
                return event;
            }
            if let Some(end) = state.phase.checkpoint().map(|i| input.profile.checkpoints[i]) {
                if measured > end.temp_c as f32 && state.elapsed_s > end.time_s as f32 {
                    state.phase = state.phase.next();
                    event = Some(ProcessEvent::PhaseChanged(state.phase));
                }
            }
            return event;
        }

        // Cooling
        state.target_c = config.cooldown_c;
        state.duty = 0;
        state.fan_on = measured > config.cooldown_c;
        if !input.sensor_fault && measured < config.cooldown_c {
            self.reset(Program::Idle);
            return Some(ProcessEvent::Finished);
        }
        event
    }

    fn reset(&mut self, program: Program) {
        self.program = program;
        self.state = ProcessState::default();
    }
}

/// Target temperature of a heating phase at `elapsed_s`
///
/// Linear interpolation between the previous checkpoint (ambient at 0 s for
/// preheat) and the phase's own checkpoint. A zero-length segment yields the
/// end temperature. Returns `None` outside the heating phases.
pub fn segment_target(
    phase: Phase,
    elapsed_s: f32,
    profile: &ProfileSnapshot,
    ambient_c: f32,
) -> Option<f32> {
    let index = phase.checkpoint()?;
    let end = profile.checkpoints[index];
    let (start_temp, start_time) = match index {
        0 => (ambient_c, 0.0),
        i => {
            let Checkpoint { temp_c, time_s } = profile.checkpoints[i - 1];
            (temp_c as f32, time_s as f32)
        }
    };

    let span = end.time_s as f32 - start_time;
    if span == 0.0 {
        return Some(end.temp_c as f32);
    }
    Some(start_temp + (elapsed_s - start_time) / span * (end.temp_c as f32 - start_temp))
}

/// Duty of a ramp phase with predictive early cutoff
///
/// Off once the plate is at target, or once the cutoff time has passed and
/// the plate is within the overshoot margin of the target. Full ramp duty
/// otherwise.
pub fn ramp_duty(
    config: &ControlConfig,
    elapsed_s: f32,
    cutoff_s: i16,
    measured_c: f32,
    target_c: f32,
) -> u8 {
    let near = elapsed_s >= cutoff_s as f32 && measured_c >= target_c - config.overshoot_margin_c;
    if near || measured_c >= target_c {
        0
    } else {
        config.ramp_duty
    }
}
