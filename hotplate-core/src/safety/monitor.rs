//! Sensor plausibility guard
//!
//! The sensor poller stores whatever it reads, including fault sentinels.
//! The guard decides per tick whether the value can be trusted.

use crate::config::ControlConfig;

/// A reading as the control loop should use it
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Temperature to control with (°C)
    pub celsius: f32,
    /// True when the raw value was implausible and `celsius` is the fallback
    pub fault: bool,
}

/// Replaces implausible readings with a safe fallback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorGuard {
    fault_above_c: f32,
    fallback_c: f32,
}

impl SensorGuard {
    pub const fn new(fault_above_c: f32, fallback_c: f32) -> Self {
        Self {
            fault_above_c,
            fallback_c,
        }
    }

    pub fn from_config(config: &ControlConfig) -> Self {
        Self::new(config.sensor_fault_above_c, config.sensor_fallback_c)
    }

    /// Check one raw reading
    ///
    /// Anything above the fault threshold, and NaN, is a fault.
    pub fn filter(&self, raw_c: f32) -> Reading {
        // Written so NaN fails the comparison
        if raw_c <= self.fault_above_c {
            Reading {
                celsius: raw_c,
                fault: false,
            }
        } else {
            Reading {
                celsius: self.fallback_c,
                fault: true,
            }
        }
    }
}

impl Default for SensorGuard {
    fn default() -> Self {
        Self::from_config(&ControlConfig::default())
    }
}
