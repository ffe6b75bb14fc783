//! Configuration type definitions
//!
//! These types hold the tunable constants of the control loop. Every value
//! has a default matching the stock hotplate; boards may override them from
//! their build-time configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum number of presets the profile store holds
pub const MAX_PRESETS: usize = 8;

/// Control tick period (ms)
pub const TICK_PERIOD_MS: u32 = 250;

/// Seconds before the end of a ramp phase at which the heater may cut off early
pub const LEAD_TIME_S: i16 = 15;

/// Ambient temperature the preheat ramp starts from (°C)
pub const AMBIENT_C: f32 = 20.0;

/// Highest temperature any profile checkpoint may ask for (°C)
pub const MAX_PROFILE_TEMP_C: i16 = 260;

/// Maximum heater duty
pub const FULL_DUTY: u8 = 255;

/// Duty used for one slowdown band of an open-loop program
///
/// The band applies while the setpoint is below `below_c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlowdownBand {
    /// Exclusive upper bound of the setpoint for this band (°C)
    pub below_c: i16,
    /// Duty while creeping towards the setpoint
    pub duty: u8,
}

/// Open-loop heating program configuration (free heating, warm-up)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OpenLoopConfig {
    /// Duty during the initial ramp
    pub rampup_duty: u8,
    /// Distance below the setpoint at which the ramp slows down (°C)
    pub gap_c: f32,
    /// Slowdown duty by setpoint, checked in order; the last band is the fallback
    pub slowdown: [SlowdownBand; 3],
    /// Duty while regulating below the setpoint
    pub regulate_duty: u8,
}

impl OpenLoopConfig {
    /// Free heating: full power, slowdown scaled to the setpoint
    pub const fn free_heating() -> Self {
        Self {
            rampup_duty: FULL_DUTY,
            gap_c: 25.0,
            slowdown: [
                SlowdownBand { below_c: 100, duty: 10 },
                SlowdownBand { below_c: 200, duty: 20 },
                SlowdownBand { below_c: i16::MAX, duty: 30 },
            ],
            regulate_duty: 40,
        }
    }

    /// Warm-up: half power and a gentle creep for low setpoints
    pub const fn warmup() -> Self {
        Self {
            rampup_duty: 125,
            gap_c: 10.0,
            slowdown: [SlowdownBand { below_c: i16::MAX, duty: 4 }; 3],
            regulate_duty: 40,
        }
    }

    /// Slowdown duty for the given setpoint
    pub fn slowdown_duty(&self, setpoint_c: f32) -> u8 {
        self.slowdown
            .iter()
            .find(|band| setpoint_c < band.below_c as f32)
            .unwrap_or(&self.slowdown[self.slowdown.len() - 1])
            .duty
    }
}

/// Default setpoints for the open-loop modes (°C)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SetpointDefaults {
    pub warmup_c: i16,
    pub free_heating_c: i16,
    pub free_cooling_c: i16,
}

impl Default for SetpointDefaults {
    fn default() -> Self {
        Self {
            warmup_c: 38,
            free_heating_c: 200,
            free_cooling_c: 40,
        }
    }
}

/// Control loop configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlConfig {
    /// Control tick period (ms)
    pub tick_period_ms: u32,
    /// Early cutoff lead time for the preheat and reflow ramps (s)
    pub lead_time_s: i16,
    /// Margin below target within which the early cutoff may fire (°C)
    pub overshoot_margin_c: f32,
    /// Start temperature of the preheat ramp (°C)
    pub ambient_c: f32,
    /// Duty while ramping in preheat and reflow
    pub ramp_duty: u8,
    /// Duty while below target in soak
    pub soak_duty: u8,
    /// Duty while below target in hold
    pub hold_duty: u8,
    /// Cooling ends once the plate drops below this (°C)
    pub cooldown_c: f32,
    /// Heating phases are abandoned for cooling after this long (s)
    pub max_run_s: f32,
    /// Readings above this are a sensor fault (°C)
    pub sensor_fault_above_c: f32,
    /// Value substituted for a faulted reading (°C)
    pub sensor_fallback_c: f32,
    /// Free heating program
    pub free_heating: OpenLoopConfig,
    /// Warm-up program
    pub warmup: OpenLoopConfig,
    /// Initial open-loop setpoints
    pub setpoints: SetpointDefaults,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: TICK_PERIOD_MS,
            lead_time_s: LEAD_TIME_S,
            overshoot_margin_c: 15.0,
            ambient_c: AMBIENT_C,
            ramp_duty: FULL_DUTY,
            soak_duty: 150,
            hold_duty: 50,
            cooldown_c: 40.0,
            max_run_s: 340.0,
            sensor_fault_above_c: 500.0,
            sensor_fallback_c: 55.0,
            free_heating: OpenLoopConfig::free_heating(),
            warmup: OpenLoopConfig::warmup(),
            setpoints: SetpointDefaults::default(),
        }
    }
}

impl ControlConfig {
    /// Tick period in seconds, the amount elapsed time advances per tick
    pub fn tick_period_s(&self) -> f32 {
        self.tick_period_ms as f32 / 1000.0
    }
}
