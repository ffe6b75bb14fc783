//! Board configuration
//!
//! Generated at build time from `hotplate.toml`; see `build.rs` for the
//! accepted keys and their ranges.

include!(concat!(env!("OUT_DIR"), "/board_config.rs"));
