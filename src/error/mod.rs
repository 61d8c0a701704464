//! Error handling for the explorer
//!
//! Expected failures of the pure core (coin selection, fee checks, input
//! validation) are returned as values inside their results. This module covers
//! everything else: provider calls, configuration and I/O.

use thiserror::Error;

/// Result type alias for explorer operations
pub type Result<T> = std::result::Result<T, TxLensError>;

/// Error types for explorer operations
#[derive(Debug, Clone, Error)]
pub enum TxLensError {
    /// The requested transaction or address does not exist upstream
    #[error("{0} not found")]
    NotFound(String),
    /// Transport or upstream status errors
    #[error("HTTP error: {0}")]
    Http(String),
    /// Upstream payload could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),
    /// Caller supplied a malformed id, address or parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// No price could be fetched and nothing is cached
    #[error("Price unavailable: {0}")]
    PriceUnavailable(String),
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TxLensError {
    /// Whether this error should surface as a 404-equivalent
    pub fn is_not_found(&self) -> bool {
        matches!(self, TxLensError::NotFound(_))
    }
}

impl From<std::io::Error> for TxLensError {
    fn from(err: std::io::Error) -> Self {
        TxLensError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for TxLensError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TxLensError::Parse(err.to_string())
        } else {
            TxLensError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TxLensError {
    fn from(err: serde_json::Error) -> Self {
        TxLensError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for TxLensError {
    fn from(err: toml::de::Error) -> Self {
        TxLensError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_mentions_not_found() {
        let err = TxLensError::NotFound("Transaction abc".to_string());
        assert_eq!(err.to_string(), "Transaction abc not found");
        assert!(err.to_string().contains("not found"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_other_errors_are_not_not_found() {
        assert!(!TxLensError::Http("503".to_string()).is_not_found());
        assert!(!TxLensError::Parse("bad json".to_string()).is_not_found());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        let err: TxLensError = io.into();
        assert!(matches!(err, TxLensError::Io(_)));
        // a missing file is an I/O failure, not a 404
        assert!(!err.is_not_found());
    }
}
