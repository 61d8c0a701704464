//! Utility functions and helpers
//!
//! Input validation for everything that arrives over HTTP or the command
//! line, and address redaction for privacy-friendly output.

pub mod redact;
pub mod validate;

pub use redact::{address_label, redact_address, truncate_address, AddressRole};
pub use validate::{
    parse_limit, validate_address, validate_string_input, validate_txid, ValidationError,
};
