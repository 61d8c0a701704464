//! Search-box input classification
//!
//! Pattern checks only: a string that "looks like" a txid or an address is
//! not validated against checksums or the chain.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static TXID_PATTERN: Lazy<Regex> = Lazy::new(|| compile(r"^[a-fA-F0-9]{64}$"));

// Legacy P2PKH, P2SH, mainnet bech32, testnet bech32
static ADDRESS_PATTERNS: Lazy<[Regex; 4]> = Lazy::new(|| {
    [
        compile(r"^1[a-km-zA-HJ-NP-Z1-9]{25,34}$"),
        compile(r"^3[a-km-zA-HJ-NP-Z1-9]{25,34}$"),
        compile(r"^bc1[a-z0-9]{39,59}$"),
        compile(r"^tb1[a-z0-9]{39,59}$"),
    ]
});

fn compile(pattern: &str) -> Regex {
    // Patterns are string literals in this file; a failure is a programming error
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern}: {e}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Txid,
    Address,
    Unknown,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Txid => write!(f, "txid"),
            InputKind::Address => write!(f, "address"),
            InputKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// 64 hexadecimal characters
pub fn is_likely_txid(input: &str) -> bool {
    TXID_PATTERN.is_match(input)
}

/// Matches a recognized legacy, P2SH or bech32 address shape
pub fn is_likely_btc_address(input: &str) -> bool {
    ADDRESS_PATTERNS.iter().any(|pattern| pattern.is_match(input))
}

/// Classify trimmed input, checking for a txid before an address
pub fn detect_input_type(input: &str) -> InputKind {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        InputKind::Unknown
    } else if is_likely_txid(trimmed) {
        InputKind::Txid
    } else if is_likely_btc_address(trimmed) {
        InputKind::Address
    } else {
        InputKind::Unknown
    }
}
