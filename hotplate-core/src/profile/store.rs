//! Read-only preset table

use heapless::Vec;

use super::active::ActiveProfile;
use super::types::{ProfileError, ThermalProfile};
use crate::config::{DEFAULT_PRESETS, MAX_PRESETS};

/// Named presets, fixed after startup
///
/// Selecting a preset copies it into the [`ActiveProfile`]; the stored
/// presets themselves are never modified.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    presets: Vec<ThermalProfile, MAX_PRESETS>,
}

impl Default for ProfileStore {
    fn default() -> Self {
        let mut presets = Vec::new();
        for preset in DEFAULT_PRESETS.iter() {
            let _ = presets.push(*preset);
        }
        Self { presets }
    }
}

impl ProfileStore {
    /// Build the store from a preset table
    ///
    /// Every preset must satisfy the profile invariants. Entries beyond
    /// [`MAX_PRESETS`] are ignored.
    pub fn new(table: &[ThermalProfile]) -> Result<Self, ProfileError> {
        if table.is_empty() {
            return Err(ProfileError::Empty);
        }

        let mut presets = Vec::new();
        for preset in table.iter().take(MAX_PRESETS) {
            preset.validate()?;
            let _ = presets.push(*preset);
        }
        Ok(Self { presets })
    }

    /// Number of presets
    pub fn len(&self) -> u8 {
        self.presets.len() as u8
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn get(&self, index: u8) -> Option<&ThermalProfile> {
        self.presets.get(index as usize)
    }

    /// Copy preset `index` into the active profile
    pub fn select(&self, index: u8, active: &ActiveProfile) -> Option<&ThermalProfile> {
        let preset = self.get(index)?;
        active.load(index, preset);
        Some(preset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Checkpoint, Param};

    #[test]
    fn test_default_store_has_builtin_pastes() {
        let store = ProfileStore::default();
        assert_eq!(store.len(), 4);
        assert_eq!(store.get(2).map(|p| p.name), Some("Sn63/Pb37"));
        assert!(store.get(4).is_none());
    }

    #[test]
    fn test_empty_table_rejected() {
        assert_eq!(ProfileStore::new(&[]).unwrap_err(), ProfileError::Empty);
    }

    #[test]
    fn test_invalid_preset_rejected() {
        let bad = ThermalProfile::new(
            "bad",
            Checkpoint::new(90, 120),
            Checkpoint::new(130, 100),
            Checkpoint::new(165, 240),
            Checkpoint::new(165, 250),
        );
        assert_eq!(
            ProfileStore::new(&[DEFAULT_PRESETS[0], bad]).unwrap_err(),
            ProfileError::OrderViolation
        );
    }

    #[test]
    fn test_select_leaves_store_untouched() {
        let store = ProfileStore::default();
        let active = ActiveProfile::new();

        store.select(0, &active);
        active.set(Param::PreheatTemp, 42);

        assert_eq!(store.get(0).map(|p| p.preheat.temp_c), Some(90));

        store.select(0, &active);
        assert_eq!(active.get(Param::PreheatTemp), 90);
    }

    #[test]
    fn test_select_out_of_range() {
        let store = ProfileStore::default();
        let active = ActiveProfile::new();
        store.select(1, &active);

        assert!(store.select(9, &active).is_none());
        assert_eq!(active.preset(), 1);
    }
}
