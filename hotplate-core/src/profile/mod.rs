//! Thermal profiles
//!
//! The preset table, the active working copy the operator edits, and the
//! checkpoint types both are built from.

pub mod active;
pub mod store;
pub mod types;

pub use active::{ActiveProfile, ProfileSnapshot};
pub use store::ProfileStore;
pub use types::{
    validate_checkpoints, Checkpoint, Param, ProfileError, ThermalProfile, CHECKPOINT_COUNT,
    PARAM_COUNT,
};
