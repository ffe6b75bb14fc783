//! Operating mode state machine
//!
//! Exactly one mode is active at a time. The mode decides which program
//! the thermal process runs and which setpoint it reads.

use super::events::{ModeError, ModeEvent, ModeRequest};
use crate::config::ControlConfig;
use crate::process::{ProcessEvent, ProcessState, ThermalProcess, TickInput};
use crate::safety::Reading;
use crate::shared::{Setpoint, SharedState};

/// Operating modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Nothing running, outputs off
    #[default]
    Idle,
    /// Following the active profile
    Reflow,
    /// Open-loop heating to the free-heating setpoint
    FreeHeating,
    /// Fan-only cooling to the free-cooling setpoint
    FreeCooling,
    /// Gentle open-loop heating to the warm-up setpoint
    Warmup,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Idle => "Idle",
            Mode::Reflow => "Reflow",
            Mode::FreeHeating => "Heating",
            Mode::FreeCooling => "Cooling",
            Mode::Warmup => "Warmup",
        }
    }

    /// Setpoint the mode regulates to, if it has one
    pub fn setpoint(self) -> Option<Setpoint> {
        match self {
            Mode::FreeHeating => Some(Setpoint::FreeHeating),
            Mode::FreeCooling => Some(Setpoint::FreeCooling),
            Mode::Warmup => Some(Setpoint::Warmup),
            Mode::Idle | Mode::Reflow => None,
        }
    }

    /// Process a request and return the next mode
    pub fn transition(self, request: ModeRequest) -> Result<Mode, ModeError> {
        use Mode::*;
        use ModeRequest::*;

        match (self, request) {
            (_, Stop) | (_, Finish) => Ok(Idle),
            (_, Toggle(Idle)) => Ok(self),
            (Idle, Toggle(requested)) => Ok(requested),
            (active, Toggle(requested)) if active == requested => Ok(Idle),
            (active, Toggle(requested)) => Err(ModeError::Busy { active, requested }),
        }
    }
}

/// Owns the active mode and the thermal process it drives
#[derive(Debug, Clone)]
pub struct ModeSupervisor {
    mode: Mode,
    process: ThermalProcess,
}

impl ModeSupervisor {
    pub fn new(config: ControlConfig) -> Self {
        Self {
            mode: Mode::Idle,
            process: ThermalProcess::new(config),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn process(&self) -> &ThermalProcess {
        &self.process
    }

    pub fn state(&self) -> &ProcessState {
        self.process.state()
    }

    /// Start `requested`, or stop it if it is the running mode
    ///
    /// Rejected without any state change while a different mode runs.
    pub fn toggle(&mut self, requested: Mode) -> Result<Option<ModeEvent>, ModeError> {
        let next = self.mode.transition(ModeRequest::Toggle(requested))?;
        if next == self.mode {
            return Ok(None);
        }

        if next == Mode::Idle {
            return Ok(self.stop());
        }

        let config = *self.process.config();
        match next {
            Mode::Reflow => self.process.start_profile(),
            Mode::FreeHeating => self.process.start_open_loop(config.free_heating),
            Mode::Warmup => self.process.start_open_loop(config.warmup),
            Mode::FreeCooling => self.process.start_fan_only(),
            Mode::Idle => {}
        }
        self.mode = next;
        Ok(Some(ModeEvent::Started(next)))
    }

    /// Stop the running mode; heater and fan go off
    pub fn stop(&mut self) -> Option<ModeEvent> {
        let stopped = self.mode;
        self.process.stop();
        self.mode = self.mode.transition(ModeRequest::Stop).unwrap_or(Mode::Idle);
        (stopped != Mode::Idle).then_some(ModeEvent::Stopped(stopped))
    }

    /// Run one control tick of the active mode
    ///
    /// A faulted reading keeps the heater off and holds the current phase
    /// or stage for this tick.
    pub fn tick(&mut self, shared: &SharedState, reading: Reading) -> Option<ModeEvent> {
        if self.mode == Mode::Idle {
            return None;
        }

        let setpoint_c = self
            .mode
            .setpoint()
            .map(|s| shared.setpoints.get(s) as f32)
            .unwrap_or(0.0);
        let input = TickInput {
            measured_c: reading.celsius,
            profile: shared.profile.snapshot(),
            setpoint_c,
            sensor_fault: reading.fault,
        };

        match self.process.tick(&input)? {
            ProcessEvent::PhaseChanged(phase) => Some(ModeEvent::PhaseChanged(phase)),
            ProcessEvent::Finished => {
                let finished = self.mode;
                self.mode = self.mode.transition(ModeRequest::Finish).unwrap_or(Mode::Idle);
                Some(ModeEvent::Finished(finished))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SetpointDefaults, DEFAULT_PRESETS};
    use crate::process::{OpenLoopStage, Phase};

    fn shared() -> SharedState {
        let shared = SharedState::new();
        shared.profile.load(0, &DEFAULT_PRESETS[0]);
        shared.setpoints.load(&SetpointDefaults::default());
        shared
    }

    fn plate(celsius: f32) -> Reading {
        Reading {
            celsius,
            fault: false,
        }
    }

    fn faulted() -> Reading {
        Reading {
            celsius: 55.0,
            fault: true,
        }
    }

    #[test]
    fn test_idle_starts_any_mode() {
        for mode in [Mode::Reflow, Mode::FreeHeating, Mode::FreeCooling, Mode::Warmup] {
            assert_eq!(Mode::Idle.transition(ModeRequest::Toggle(mode)), Ok(mode));
        }
    }

    #[test]
    fn test_toggle_own_mode_stops() {
        assert_eq!(
            Mode::Warmup.transition(ModeRequest::Toggle(Mode::Warmup)),
            Ok(Mode::Idle)
        );
    }

    #[test]
    fn test_other_mode_rejected() {
        assert_eq!(
            Mode::Reflow.transition(ModeRequest::Toggle(Mode::FreeHeating)),
            Err(ModeError::Busy {
                active: Mode::Reflow,
                requested: Mode::FreeHeating
            })
        );
    }

    #[test]
    fn test_stop_and_finish_from_any_mode() {
        let modes = [
            Mode::Idle,
            Mode::Reflow,
            Mode::FreeHeating,
            Mode::FreeCooling,
            Mode::Warmup,
        ];
        for mode in modes {
            assert_eq!(mode.transition(ModeRequest::Stop), Ok(Mode::Idle));
            assert_eq!(mode.transition(ModeRequest::Finish), Ok(Mode::Idle));
        }
    }

    #[test]
    fn test_supervisor_rejects_second_mode() {
        let shared = shared();
        let mut supervisor = ModeSupervisor::new(ControlConfig::default());
        supervisor.toggle(Mode::Reflow).ok();
        supervisor.tick(&shared, plate(25.0));
        let before = *supervisor.state();

        let result = supervisor.toggle(Mode::FreeHeating);
        assert!(matches!(result, Err(ModeError::Busy { .. })));
        assert_eq!(supervisor.mode(), Mode::Reflow);
        assert_eq!(*supervisor.state(), before);
    }

    #[test]
    fn test_start_resets_process() {
        let shared = shared();
        let mut supervisor = ModeSupervisor::new(ControlConfig::default());

        assert_eq!(
            supervisor.toggle(Mode::Reflow),
            Ok(Some(ModeEvent::Started(Mode::Reflow)))
        );
        assert_eq!(supervisor.state().phase, Phase::Preheat);
        assert_eq!(supervisor.state().elapsed_s, 0.0);

        supervisor.tick(&shared, plate(25.0));
        assert_eq!(supervisor.state().duty, 255);
    }

    #[test]
    fn test_stop_zeroes_outputs() {
        let shared = shared();
        let mut supervisor = ModeSupervisor::new(ControlConfig::default());
        supervisor.toggle(Mode::FreeCooling).ok();
        supervisor.tick(&shared, plate(120.0));
        assert!(supervisor.state().fan_on);

        assert_eq!(
            supervisor.toggle(Mode::FreeCooling),
            Ok(Some(ModeEvent::Stopped(Mode::FreeCooling)))
        );
        assert_eq!(supervisor.mode(), Mode::Idle);
        assert!(!supervisor.state().fan_on);
        assert_eq!(supervisor.state().duty, 0);
    }

    #[test]
    fn test_open_loop_reads_live_setpoint() {
        let shared = shared();
        let mut supervisor = ModeSupervisor::new(ControlConfig::default());
        supervisor.toggle(Mode::Warmup).ok();
        assert_eq!(supervisor.state().stage, Some(OpenLoopStage::Rampup));

        supervisor.tick(&shared, plate(20.0));
        assert_eq!(supervisor.state().target_c, 38.0);

        shared.setpoints.set(Setpoint::Warmup, 50);
        supervisor.tick(&shared, plate(20.0));
        assert_eq!(supervisor.state().target_c, 50.0);
    }

    #[test]
    fn test_fault_does_not_latch_warmup_regulate() {
        let shared = shared();
        let mut supervisor = ModeSupervisor::new(ControlConfig::default());
        supervisor.toggle(Mode::Warmup).ok();

        supervisor.tick(&shared, plate(20.0));
        assert_eq!(supervisor.state().stage, Some(OpenLoopStage::Rampup));
        assert_eq!(supervisor.state().duty, 125);

        // Fallback is above every warm-up setpoint
        supervisor.tick(&shared, faulted());
        assert_eq!(supervisor.state().duty, 0);

        supervisor.tick(&shared, plate(20.0));
        assert_eq!(supervisor.state().stage, Some(OpenLoopStage::Rampup));
        assert_eq!(supervisor.state().duty, 125);
    }

    #[test]
    fn test_fault_does_not_skip_preheat() {
        let shared = shared();
        shared.profile.set(crate::profile::Param::temp_of(0), 50);
        let mut supervisor = ModeSupervisor::new(ControlConfig::default());
        supervisor.toggle(Mode::Reflow).ok();

        while supervisor.state().elapsed_s <= 91.0 {
            supervisor.tick(&shared, plate(20.0));
        }
        assert_eq!(supervisor.tick(&shared, faulted()), None);
        assert_eq!(supervisor.state().phase, Phase::Preheat);
        assert_eq!(supervisor.mode(), Mode::Reflow);
    }

    #[test]
    fn test_finish_returns_to_idle() {
        let shared = shared();
        let mut supervisor = ModeSupervisor::new(ControlConfig::default());
        supervisor.toggle(Mode::Reflow).ok();

        let mut finished = None;
        for _ in 0..4000 {
            let measured = if supervisor.state().phase == Phase::Cooling { 30.0 } else { 250.0 };
            if let Some(ModeEvent::Finished(mode)) = supervisor.tick(&shared, plate(measured)) {
                finished = Some(mode);
                break;
            }
        }
        assert_eq!(finished, Some(Mode::Reflow));
        assert_eq!(supervisor.mode(), Mode::Idle);
    }

    #[test]
    fn test_idle_tick_does_nothing() {
        let shared = shared();
        let mut supervisor = ModeSupervisor::new(ControlConfig::default());
        assert_eq!(supervisor.tick(&shared, plate(25.0)), None);
        assert_eq!(supervisor.stop(), None);
    }
}
