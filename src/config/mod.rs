//! Configuration management
//!
//! Settings come from an optional TOML file with environment overrides on
//! top. Every field has a default, so running without a file works.

pub mod settings;

pub use settings::{Config, GLOBAL_CONFIG};
