//! Command-line interface
//!
//! Argument parsing lives in `commands`; `output` turns explorer data into
//! the plain-text tables the binary prints.

pub mod commands;
pub mod output;
pub mod quiz;

pub use commands::{Command, Opt};
