//! Thermal profile definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::MAX_PROFILE_TEMP_C;

/// Number of checkpoints in a profile
pub const CHECKPOINT_COUNT: usize = 4;

/// Number of editable profile parameters (temperature and time per checkpoint)
pub const PARAM_COUNT: usize = CHECKPOINT_COUNT * 2;

/// End point of a phase: temperature reached at a time from process start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Checkpoint {
    /// Temperature (°C)
    pub temp_c: i16,
    /// Seconds since process start
    pub time_s: i16,
}

impl Checkpoint {
    pub const fn new(temp_c: i16, time_s: i16) -> Self {
        Self { temp_c, time_s }
    }
}

/// Reasons a profile is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProfileError {
    /// Checkpoint times are not strictly increasing (or start below zero)
    OrderViolation,
    /// A checkpoint temperature is outside the device-safe range
    TemperatureOutOfRange,
    /// The preset table is empty
    Empty,
}

/// Named thermal profile preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ThermalProfile {
    /// Display name (solder paste)
    pub name: &'static str,
    /// End of the preheat ramp
    pub preheat: Checkpoint,
    /// End of the soak plateau
    pub soak: Checkpoint,
    /// Reflow peak
    pub reflow: Checkpoint,
    /// End of the hold above liquidus, start of cooling
    pub hold: Checkpoint,
}

impl ThermalProfile {
    pub const fn new(
        name: &'static str,
        preheat: Checkpoint,
        soak: Checkpoint,
        reflow: Checkpoint,
        hold: Checkpoint,
    ) -> Self {
        Self {
            name,
            preheat,
            soak,
            reflow,
            hold,
        }
    }

    /// Checkpoints in process order
    pub fn checkpoints(&self) -> [Checkpoint; CHECKPOINT_COUNT] {
        [self.preheat, self.soak, self.reflow, self.hold]
    }

    /// Check the ordering and range invariants
    pub fn validate(&self) -> Result<(), ProfileError> {
        validate_checkpoints(&self.checkpoints())
    }
}

/// Check that times start at or after zero and strictly increase, and that
/// every temperature is within the device-safe range
pub fn validate_checkpoints(points: &[Checkpoint; CHECKPOINT_COUNT]) -> Result<(), ProfileError> {
    if points[0].time_s < 0 {
        return Err(ProfileError::OrderViolation);
    }
    if points.windows(2).any(|w| w[0].time_s >= w[1].time_s) {
        return Err(ProfileError::OrderViolation);
    }
    if points
        .iter()
        .any(|p| p.temp_c < 0 || p.temp_c > MAX_PROFILE_TEMP_C)
    {
        return Err(ProfileError::TemperatureOutOfRange);
    }
    Ok(())
}

/// Editable profile parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Param {
    PreheatTemp,
    PreheatTime,
    SoakTemp,
    SoakTime,
    ReflowTemp,
    ReflowTime,
    HoldTemp,
    HoldTime,
}

impl Param {
    /// All parameters, in storage order
    pub const ALL: [Param; PARAM_COUNT] = [
        Param::PreheatTemp,
        Param::PreheatTime,
        Param::SoakTemp,
        Param::SoakTime,
        Param::ReflowTemp,
        Param::ReflowTime,
        Param::HoldTemp,
        Param::HoldTime,
    ];

    /// Storage slot
    pub fn index(self) -> usize {
        self as usize
    }

    /// Index of the checkpoint this parameter belongs to
    pub fn checkpoint(self) -> usize {
        self.index() / 2
    }

    /// True for the time half of a checkpoint
    pub fn is_time(self) -> bool {
        self.index() % 2 == 1
    }

    /// Temperature parameter of checkpoint `index`
    pub fn temp_of(index: usize) -> Param {
        Self::ALL[index * 2]
    }

    /// Time parameter of checkpoint `index`
    pub fn time_of(index: usize) -> Param {
        Self::ALL[index * 2 + 1]
    }
}
