//! Built-in solder paste presets
//!
//! Times are seconds from process start, not phase lengths.

use crate::profile::{Checkpoint, ThermalProfile};

/// Preset table used when a board provides none of its own
pub const DEFAULT_PRESETS: [ThermalProfile; 4] = [
    ThermalProfile::new(
        "Sn42/Bi57.6/Ag0.4",
        Checkpoint::new(90, 90),
        Checkpoint::new(130, 180),
        Checkpoint::new(165, 240),
        Checkpoint::new(165, 250),
    ),
    ThermalProfile::new(
        "Sn42/Bi57/Ag1",
        Checkpoint::new(90, 90),
        Checkpoint::new(130, 180),
        Checkpoint::new(165, 240),
        Checkpoint::new(165, 250),
    ),
    ThermalProfile::new(
        "Sn63/Pb37",
        Checkpoint::new(100, 30),
        Checkpoint::new(150, 120),
        Checkpoint::new(235, 210),
        Checkpoint::new(235, 220),
    ),
    ThermalProfile::new(
        "Sn63/Pb37 Mod",
        Checkpoint::new(100, 60),
        Checkpoint::new(150, 120),
        Checkpoint::new(235, 210),
        Checkpoint::new(235, 220),
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_presets_are_valid() {
        for preset in DEFAULT_PRESETS.iter() {
            assert_eq!(preset.validate(), Ok(()), "{}", preset.name);
        }
    }
}
