//! The active, editable profile
//!
//! Every parameter is its own atomic so the encoder interrupt can step a
//! value while the main loop reads the rest. No invariant spans two cells:
//! a reader may see a freshly edited time together with a cutoff that is
//! recomputed a moment later.

use portable_atomic::{AtomicI16, AtomicU8, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::{Checkpoint, Param, ThermalProfile, CHECKPOINT_COUNT, PARAM_COUNT};
use crate::config::LEAD_TIME_S;

/// Point-in-time copy of the active profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProfileSnapshot {
    /// Preset the values were loaded from
    pub preset: u8,
    /// Preheat, soak, reflow and hold checkpoints
    pub checkpoints: [Checkpoint; CHECKPOINT_COUNT],
    /// Time after which the preheat ramp may cut off early (s)
    pub preheat_cutoff_s: i16,
    /// Time after which the reflow ramp may cut off early (s)
    pub reflow_cutoff_s: i16,
}

impl ProfileSnapshot {
    pub fn preheat(&self) -> Checkpoint {
        self.checkpoints[0]
    }

    pub fn soak(&self) -> Checkpoint {
        self.checkpoints[1]
    }

    pub fn reflow(&self) -> Checkpoint {
        self.checkpoints[2]
    }

    pub fn hold(&self) -> Checkpoint {
        self.checkpoints[3]
    }

    /// Curve points for plotting, starting at the ambient origin
    pub fn curve(&self, ambient_c: i16) -> [Checkpoint; CHECKPOINT_COUNT + 1] {
        let mut points = [Checkpoint::new(ambient_c, 0); CHECKPOINT_COUNT + 1];
        points[1..].copy_from_slice(&self.checkpoints);
        points
    }
}

/// Working copy of the selected preset plus derived cutoffs
pub struct ActiveProfile {
    preset: AtomicU8,
    values: [AtomicI16; PARAM_COUNT],
    lead_time_s: AtomicI16,
    preheat_cutoff_s: AtomicI16,
    reflow_cutoff_s: AtomicI16,
}

impl Default for ActiveProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveProfile {
    /// Empty profile; load a preset before use
    pub const fn new() -> Self {
        Self {
            preset: AtomicU8::new(0),
            values: [const { AtomicI16::new(0) }; PARAM_COUNT],
            lead_time_s: AtomicI16::new(LEAD_TIME_S),
            preheat_cutoff_s: AtomicI16::new(-LEAD_TIME_S),
            reflow_cutoff_s: AtomicI16::new(-LEAD_TIME_S),
        }
    }

    /// Copy a preset into the working values and recompute the cutoffs
    pub fn load(&self, index: u8, profile: &ThermalProfile) {
        for (i, point) in profile.checkpoints().iter().enumerate() {
            self.values[Param::temp_of(i).index()].store(point.temp_c, Ordering::Release);
            self.values[Param::time_of(i).index()].store(point.time_s, Ordering::Release);
        }
        self.preset.store(index, Ordering::Release);
        self.recompute_cutoffs();
    }

    /// Change the early cutoff lead time
    pub fn set_lead_time(&self, lead_time_s: i16) {
        self.lead_time_s.store(lead_time_s, Ordering::Release);
        self.recompute_cutoffs();
    }

    /// Index of the preset the values came from
    pub fn preset(&self) -> u8 {
        self.preset.load(Ordering::Acquire)
    }

    pub fn get(&self, param: Param) -> i16 {
        self.values[param.index()].load(Ordering::Acquire)
    }

    /// Store one parameter; cutoffs follow the preheat and reflow times
    pub fn set(&self, param: Param, value: i16) {
        self.values[param.index()].store(value, Ordering::Release);
        if matches!(param, Param::PreheatTime | Param::ReflowTime) {
            self.recompute_cutoffs();
        }
    }

    pub fn checkpoint(&self, index: usize) -> Checkpoint {
        Checkpoint::new(
            self.get(Param::temp_of(index)),
            self.get(Param::time_of(index)),
        )
    }

    pub fn checkpoints(&self) -> [Checkpoint; CHECKPOINT_COUNT] {
        core::array::from_fn(|i| self.checkpoint(i))
    }

    pub fn preheat_cutoff_s(&self) -> i16 {
        self.preheat_cutoff_s.load(Ordering::Acquire)
    }

    pub fn reflow_cutoff_s(&self) -> i16 {
        self.reflow_cutoff_s.load(Ordering::Acquire)
    }

    /// Range a time parameter may take without touching its neighbours
    ///
    /// Temperature parameters are unconstrained by their neighbours and
    /// return the full `i16` range.
    pub fn neighbour_bounds(&self, param: Param) -> (i16, i16) {
        if !param.is_time() {
            return (i16::MIN, i16::MAX);
        }
        let index = param.checkpoint();
        let lower = match index {
            0 => i16::MIN,
            i => self.get(Param::time_of(i - 1)).saturating_add(1),
        };
        let upper = if index + 1 < CHECKPOINT_COUNT {
            self.get(Param::time_of(index + 1)).saturating_sub(1)
        } else {
            i16::MAX
        };
        (lower, upper)
    }

    pub fn snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot {
            preset: self.preset(),
            checkpoints: self.checkpoints(),
            preheat_cutoff_s: self.preheat_cutoff_s(),
            reflow_cutoff_s: self.reflow_cutoff_s(),
        }
    }

    fn recompute_cutoffs(&self) {
        let lead = self.lead_time_s.load(Ordering::Acquire);
        let preheat = self.get(Param::PreheatTime).saturating_sub(lead);
        let reflow = self.get(Param::ReflowTime).saturating_sub(lead);
        self.preheat_cutoff_s.store(preheat, Ordering::Release);
        self.reflow_cutoff_s.store(reflow, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PRESETS;

    #[test]
    fn test_load_copies_values_and_cutoffs() {
        let active = ActiveProfile::new();
        active.load(2, &DEFAULT_PRESETS[2]);

        assert_eq!(active.preset(), 2);
        assert_eq!(active.get(Param::PreheatTemp), 100);
        assert_eq!(active.get(Param::HoldTime), 220);
        assert_eq!(active.preheat_cutoff_s(), 30 - 15);
        assert_eq!(active.reflow_cutoff_s(), 210 - 15);
    }

    #[test]
    fn test_time_edit_recomputes_cutoff() {
        let active = ActiveProfile::new();
        active.load(0, &DEFAULT_PRESETS[0]);

        active.set(Param::PreheatTime, 80);
        assert_eq!(active.preheat_cutoff_s(), 65);

        active.set(Param::ReflowTime, 230);
        assert_eq!(active.reflow_cutoff_s(), 215);

        // Temperatures leave the cutoffs alone
        active.set(Param::ReflowTemp, 170);
        assert_eq!(active.reflow_cutoff_s(), 215);
    }

    #[test]
    fn test_lead_time_change() {
        let active = ActiveProfile::new();
        active.load(0, &DEFAULT_PRESETS[0]);
        active.set_lead_time(10);
        assert_eq!(active.preheat_cutoff_s(), 80);
        assert_eq!(active.reflow_cutoff_s(), 230);
    }

    #[test]
    fn test_neighbour_bounds() {
        let active = ActiveProfile::new();
        active.load(0, &DEFAULT_PRESETS[0]); // 90, 180, 240, 250

        assert_eq!(active.neighbour_bounds(Param::PreheatTime), (i16::MIN, 179));
        assert_eq!(active.neighbour_bounds(Param::SoakTime), (91, 239));
        assert_eq!(active.neighbour_bounds(Param::ReflowTime), (181, 249));
        assert_eq!(active.neighbour_bounds(Param::HoldTime), (241, i16::MAX));
        assert_eq!(
            active.neighbour_bounds(Param::SoakTemp),
            (i16::MIN, i16::MAX)
        );
    }

    #[test]
    fn test_snapshot_curve_starts_at_ambient() {
        let active = ActiveProfile::new();
        active.load(0, &DEFAULT_PRESETS[0]);
        let curve = active.snapshot().curve(20);

        assert_eq!(curve[0], Checkpoint::new(20, 0));
        assert_eq!(curve[1], Checkpoint::new(90, 90));
        assert_eq!(curve[4], Checkpoint::new(165, 250));
    }
}
