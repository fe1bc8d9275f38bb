//! Small helpers shared across the workspace: environment lookups and TOML
//! config loading.

pub mod config;
pub mod env;
