//! Configuration types
//!
//! Control constants and the built-in preset table. Boards override the
//! defaults at startup; nothing here is persisted at runtime.

pub mod presets;
pub mod types;

pub use presets::DEFAULT_PRESETS;
pub use types::*;
