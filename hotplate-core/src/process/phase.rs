//! Reflow process phases

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Phase of the thermal process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Phase {
    /// Nothing running, or an open-loop mode is in control
    #[default]
    Idle,
    /// Ramp from ambient to the preheat checkpoint
    Preheat,
    /// Slow climb to the soak checkpoint
    Soak,
    /// Ramp to the reflow peak
    Reflow,
    /// Hold above liquidus
    Hold,
    /// Heater off, fan until the plate is cool
    Cooling,
}

impl Phase {
    /// Short status label
    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Preheat => "Preheat",
            Phase::Soak => "Soak",
            Phase::Reflow => "Reflow",
            Phase::Hold => "Hold",
            Phase::Cooling => "Cooling",
        }
    }

    /// True for the phases that follow a profile segment
    pub fn is_heating(self) -> bool {
        matches!(
            self,
            Phase::Preheat | Phase::Soak | Phase::Reflow | Phase::Hold
        )
    }

    /// Checkpoint that ends this phase
    pub fn checkpoint(self) -> Option<usize> {
        match self {
            Phase::Preheat => Some(0),
            Phase::Soak => Some(1),
            Phase::Reflow => Some(2),
            Phase::Hold => Some(3),
            Phase::Idle | Phase::Cooling => None,
        }
    }

    /// Phase entered once this one's end checkpoint is passed
    pub fn next(self) -> Phase {
        match self {
            Phase::Preheat => Phase::Soak,
            Phase::Soak => Phase::Reflow,
            Phase::Reflow => Phase::Hold,
            Phase::Hold => Phase::Cooling,
            Phase::Cooling | Phase::Idle => Phase::Idle,
        }
    }
}
