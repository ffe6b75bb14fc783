//! Open-loop heating program
//!
//! Used by free heating and warm-up. The plate is driven hard until it is
//! within a gap of the setpoint, then crept up at a low duty, then held with
//! a small duty whenever it drops below the setpoint. Stages only move
//! forward for the lifetime of one run.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::OpenLoopConfig;

/// Stage of the open-loop program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OpenLoopStage {
    Rampup,
    Slowdown,
    Regulate,
}

/// Three-stage setpoint heater
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenLoopHeater {
    config: OpenLoopConfig,
    stage: OpenLoopStage,
}

impl OpenLoopHeater {
    /// Start a fresh run in the ramp-up stage
    pub const fn new(config: OpenLoopConfig) -> Self {
        Self {
            config,
            stage: OpenLoopStage::Rampup,
        }
    }

    pub fn stage(&self) -> OpenLoopStage {
        self.stage
    }

    /// Advance the stage and return the duty for this tick
    pub fn update(&mut self, target_c: f32, measured_c: f32) -> u8 {
        if self.stage == OpenLoopStage::Rampup {
            if measured_c >= target_c {
                self.stage = OpenLoopStage::Regulate;
            } else if target_c - measured_c < self.config.gap_c {
                self.stage = OpenLoopStage::Slowdown;
            }
        }
        if self.stage == OpenLoopStage::Slowdown && measured_c >= target_c {
            self.stage = OpenLoopStage::Regulate;
        }

        match self.stage {
            OpenLoopStage::Rampup => self.config.rampup_duty,
            OpenLoopStage::Slowdown => self.config.slowdown_duty(target_c),
            OpenLoopStage::Regulate if measured_c < target_c => self.config.regulate_duty,
            OpenLoopStage::Regulate => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_heating_stages() {
        let mut heater = OpenLoopHeater::new(OpenLoopConfig::free_heating());

        assert_eq!(heater.update(200.0, 25.0), 255);
        assert_eq!(heater.stage(), OpenLoopStage::Rampup);

        // Within 25 °C of a 200 °C target: top band
        assert_eq!(heater.update(200.0, 180.0), 30);
        assert_eq!(heater.stage(), OpenLoopStage::Slowdown);

        assert_eq!(heater.update(200.0, 200.0), 0);
        assert_eq!(heater.stage(), OpenLoopStage::Regulate);

        assert_eq!(heater.update(200.0, 195.0), 40);
        assert_eq!(heater.stage(), OpenLoopStage::Regulate);
    }

    #[test]
    fn test_slowdown_band_follows_setpoint() {
        let mut low = OpenLoopHeater::new(OpenLoopConfig::free_heating());
        assert_eq!(low.update(80.0, 70.0), 10);

        let mut mid = OpenLoopHeater::new(OpenLoopConfig::free_heating());
        assert_eq!(mid.update(150.0, 140.0), 20);
    }

    #[test]
    fn test_warmup_stages() {
        let mut heater = OpenLoopHeater::new(OpenLoopConfig::warmup());
        assert_eq!(heater.update(38.0, 20.0), 125);
        assert_eq!(heater.update(38.0, 30.0), 4);
        assert_eq!(heater.update(38.0, 39.0), 0);
        assert_eq!(heater.update(38.0, 37.0), 40);
    }

    #[test]
    fn test_starting_above_target_regulates() {
        let mut heater = OpenLoopHeater::new(OpenLoopConfig::warmup());
        assert_eq!(heater.update(38.0, 50.0), 0);
        assert_eq!(heater.stage(), OpenLoopStage::Regulate);
    }

    #[test]
    fn test_stage_never_goes_back() {
        let mut heater = OpenLoopHeater::new(OpenLoopConfig::free_heating());
        heater.update(200.0, 190.0);
        assert_eq!(heater.stage(), OpenLoopStage::Slowdown);

        // Plate drops well below target again: keeps creeping
        assert_eq!(heater.update(200.0, 120.0), 30);
        assert_eq!(heater.stage(), OpenLoopStage::Slowdown);
    }
}
