//! State shared between the interrupt context and the main loop
//!
//! Everything in here is built from single-field atomics. The encoder
//! interrupt writes the selection and the value under edit; the main loop
//! reads them and owns every multi-step decision. A board keeps one
//! [`SharedState`] (typically in a `static`) and hands references to the
//! encoder handler and the [`Controller`](crate::Controller).

use portable_atomic::{AtomicF32, AtomicI16, Ordering};

use crate::config::SetpointDefaults;
use crate::input::Selection;
use crate::profile::ActiveProfile;
use crate::traits::TemperatureSource;

/// Target of one of the open-loop modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Setpoint {
    Warmup,
    FreeHeating,
    FreeCooling,
}

/// Editable open-loop setpoints (°C)
pub struct ModeSetpoints {
    warmup_c: AtomicI16,
    free_heating_c: AtomicI16,
    free_cooling_c: AtomicI16,
}

impl Default for ModeSetpoints {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeSetpoints {
    pub const fn new() -> Self {
        Self {
            warmup_c: AtomicI16::new(0),
            free_heating_c: AtomicI16::new(0),
            free_cooling_c: AtomicI16::new(0),
        }
    }

    /// Apply the configured initial setpoints
    pub fn load(&self, defaults: &SetpointDefaults) {
        self.set(Setpoint::Warmup, defaults.warmup_c);
        self.set(Setpoint::FreeHeating, defaults.free_heating_c);
        self.set(Setpoint::FreeCooling, defaults.free_cooling_c);
    }

    pub fn get(&self, setpoint: Setpoint) -> i16 {
        self.cell(setpoint).load(Ordering::Acquire)
    }

    pub fn set(&self, setpoint: Setpoint, value: i16) {
        self.cell(setpoint).store(value, Ordering::Release);
    }

    fn cell(&self, setpoint: Setpoint) -> &AtomicI16 {
        match setpoint {
            Setpoint::Warmup => &self.warmup_c,
            Setpoint::FreeHeating => &self.free_heating_c,
            Setpoint::FreeCooling => &self.free_cooling_c,
        }
    }
}

/// Latest temperature reading, written by the sensor poller
///
/// Starts out as NaN, which the sensor guard treats as a fault until the
/// first conversion lands.
pub struct TemperatureCell {
    celsius: AtomicF32,
}

impl Default for TemperatureCell {
    fn default() -> Self {
        Self::new()
    }
}

impl TemperatureCell {
    pub const fn new() -> Self {
        Self {
            celsius: AtomicF32::new(f32::NAN),
        }
    }

    pub fn store(&self, celsius: f32) {
        self.celsius.store(celsius, Ordering::Release);
    }

    pub fn load(&self) -> f32 {
        self.celsius.load(Ordering::Acquire)
    }
}

impl TemperatureSource for &TemperatureCell {
    fn read(&mut self) -> f32 {
        self.load()
    }
}

/// All state touched from more than one execution context
pub struct SharedState {
    /// Field selection, edit flag and pending signals
    pub selection: Selection,
    /// The profile being edited and executed
    pub profile: ActiveProfile,
    /// Open-loop mode targets
    pub setpoints: ModeSetpoints,
    /// Latest cached temperature
    pub temperature: TemperatureCell,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            selection: Selection::new(),
            profile: ActiveProfile::new(),
            setpoints: ModeSetpoints::new(),
            temperature: TemperatureCell::new(),
        }
    }
}
