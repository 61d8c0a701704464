//! Test fixtures shared by unit tests across modules

pub mod test_utils;

pub use test_utils::*;
