//! Request input validation
//!
//! Every value coming from a URL or a query string passes through here before
//! it reaches a provider. Inputs are trimmed, bounded in length, screened for
//! obvious injection payloads and finally checked against the txid/address
//! shapes from `core::classify`.

use crate::core::classify::{is_likely_btc_address, is_likely_txid};
use crate::error::TxLensError;
use once_cell::sync::Lazy;
use regex::RegexSet;
use thiserror::Error;

pub const MAX_INPUT_LENGTH: usize = 200;
pub const MAX_TXID_LENGTH: usize = 64;
pub const MAX_ADDRESS_LENGTH: usize = 100;

pub const DEFAULT_TX_LIMIT: usize = 25;
pub const MAX_TX_LIMIT: usize = 100;
const MAX_LIMIT_PARAM_LENGTH: usize = 10;

// Keywords and markup only: quotes and other punctuation are left alone
static MALICIOUS_PATTERNS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"(?i)\b(SELECT|INSERT|UPDATE|DELETE|DROP|CREATE|ALTER|EXEC|EXECUTE|UNION|SCRIPT)\b",
        r"(?i)(xp_|sp_)",
        r"(?i)<script",
        r"(?i)javascript:",
        r"(?i)on\w+\s*=",
        r"(?i)<iframe",
        r"(?i)<object",
        r"(?i)<embed",
        r"(?i)\b(cat|ls|pwd|whoami|id|uname|curl|wget|nc|netcat)\s",
        r"\x00",
    ])
    .unwrap_or_else(|e| panic!("invalid built-in pattern set: {e}"))
});

/// Which kind of value failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Txid,
    Address,
    Input,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Txid => write!(f, "Transaction ID"),
            Field::Address => write!(f, "Address"),
            Field::Input => write!(f, "Input"),
        }
    }
}

fn lowercase_noun(field: &Field) -> &'static str {
    match field {
        Field::Txid => "transaction ID",
        Field::Address => "address",
        Field::Input => "input",
    }
}

fn too_long_message(field: &Field, max: &usize) -> String {
    match field {
        Field::Input => format!("Input exceeds maximum length of {max} characters"),
        _ => format!("{field} is too long"),
    }
}

fn format_message(field: &Field) -> &'static str {
    match field {
        Field::Txid => "Invalid transaction ID format",
        Field::Address => "Invalid Bitcoin address format",
        Field::Input => "Invalid input format",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} cannot be empty")]
    Empty(Field),
    #[error("{}", too_long_message(.0, .1))]
    TooLong(Field, usize),
    #[error("Invalid characters in {}", lowercase_noun(.0))]
    Malicious(Field),
    #[error("{}", format_message(.0))]
    BadFormat(Field),
    #[error("Invalid limit parameter")]
    InvalidLimit,
    #[error("Limit must be between 1 and 100")]
    LimitOutOfRange,
}

impl From<ValidationError> for TxLensError {
    fn from(err: ValidationError) -> Self {
        TxLensError::InvalidInput(err.to_string())
    }
}

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

pub fn contains_malicious_patterns(input: &str) -> bool {
    MALICIOUS_PATTERNS.is_match(input)
}

fn sanitize(input: &str, field: Field, max_len: usize) -> ValidationResult<String> {
    let sanitized = input.trim();
    if sanitized.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    if sanitized.chars().count() > max_len {
        return Err(ValidationError::TooLong(field, max_len));
    }
    if contains_malicious_patterns(sanitized) {
        return Err(ValidationError::Malicious(field));
    }
    Ok(sanitized.to_string())
}

/// Trimmed txid, or why it was rejected
pub fn validate_txid(input: &str) -> ValidationResult<String> {
    let sanitized = sanitize(input, Field::Txid, MAX_TXID_LENGTH)?;
    if !is_likely_txid(&sanitized) {
        return Err(ValidationError::BadFormat(Field::Txid));
    }
    Ok(sanitized)
}

/// Trimmed address, or why it was rejected
pub fn validate_address(input: &str) -> ValidationResult<String> {
    let sanitized = sanitize(input, Field::Address, MAX_ADDRESS_LENGTH)?;
    if !is_likely_btc_address(&sanitized) {
        return Err(ValidationError::BadFormat(Field::Address));
    }
    Ok(sanitized)
}

pub fn validate_string_input(input: &str, max_len: usize) -> ValidationResult<String> {
    sanitize(input, Field::Input, max_len)
}

/// Parse the `limit` query parameter for address transaction listings
///
/// A missing or empty parameter means the default of 25.
pub fn parse_limit(param: Option<&str>) -> ValidationResult<usize> {
    let raw = match param {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(DEFAULT_TX_LIMIT),
    };
    let sanitized = validate_string_input(raw, MAX_LIMIT_PARAM_LENGTH)
        .map_err(|_| ValidationError::InvalidLimit)?;
    match sanitized.parse::<usize>() {
        Ok(limit) if (1..=MAX_TX_LIMIT).contains(&limit) => Ok(limit),
        _ => Err(ValidationError::LimitOutOfRange),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TXID: &str = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";
    const ADDRESS: &str = "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq";

    fn message<T: std::fmt::Debug>(result: ValidationResult<T>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn test_valid_txid_is_trimmed() {
        assert_eq!(validate_txid(&format!("  {TXID}\n")).unwrap(), TXID);
    }

    #[test]
    fn test_txid_errors() {
        assert_eq!(message(validate_txid("   ")), "Transaction ID cannot be empty");
        assert_eq!(message(validate_txid(&"a".repeat(65))), "Transaction ID is too long");
        assert_eq!(message(validate_txid("abc123")), "Invalid transaction ID format");
        assert_eq!(
            message(validate_txid("<script>alert(1)</script>")),
            "Invalid characters in transaction ID"
        );
    }

    #[test]
    fn test_address_errors() {
        assert_eq!(validate_address(ADDRESS).unwrap(), ADDRESS);
        assert_eq!(message(validate_address("")), "Address cannot be empty");
        assert_eq!(message(validate_address(&"1".repeat(101))), "Address is too long");
        assert_eq!(message(validate_address("bc1qnotreal")), "Invalid Bitcoin address format");
        assert_eq!(
            message(validate_address("1' UNION SELECT * FROM users")),
            "Invalid characters in address"
        );
    }

    #[test]
    fn test_malicious_patterns() {
        for payload in [
            "DROP TABLE tx",
            "exec xp_cmdshell",
            "javascript:alert(1)",
            "<img src=x onerror=alert(1)>",
            "<iframe src=evil>",
            "cat /etc/passwd",
            "a\0b",
        ] {
            assert!(contains_malicious_patterns(payload), "{payload:?}");
        }
        // Real identifiers must pass
        assert!(!contains_malicious_patterns(TXID));
        assert!(!contains_malicious_patterns(ADDRESS));
        assert!(!contains_malicious_patterns("3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy"));
        // Command words only count when followed by whitespace
        assert!(!contains_malicious_patterns("catalog"));
    }

    #[test]
    fn test_string_input_length() {
        assert_eq!(validate_string_input(" ok ", 10).unwrap(), "ok");
        assert_eq!(
            message(validate_string_input("12345678901", 10)),
            "Input exceeds maximum length of 10 characters"
        );
        assert_eq!(message(validate_string_input("", 10)), "Input cannot be empty");
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None).unwrap(), 25);
        assert_eq!(parse_limit(Some("")).unwrap(), 25);
        assert_eq!(parse_limit(Some("1")).unwrap(), 1);
        assert_eq!(parse_limit(Some(" 100 ")).unwrap(), 100);

        for bad in ["0", "101", "-3", "ten"] {
            assert_eq!(
                message(parse_limit(Some(bad))),
                "Limit must be between 1 and 100"
            );
        }
        assert_eq!(message(parse_limit(Some("12345678901"))), "Invalid limit parameter");
    }

    #[test]
    fn test_conversion_to_crate_error() {
        let err: TxLensError = ValidationError::BadFormat(Field::Txid).into();
        assert!(matches!(err, TxLensError::InvalidInput(ref m) if m == "Invalid transaction ID format"));
    }
}
