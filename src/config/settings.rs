use crate::error::{Result, TxLensError};
use crate::provider::{DEFAULT_MEMPOOL_URL, DEFAULT_PRICE_API_URL};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Defaults plus environment overrides, for callers without a config file
pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(Config::from_env);

static DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

const PROVIDER_URL_KEY: &str = "TXLENS_PROVIDER_URL";
const PRICE_API_URL_KEY: &str = "TXLENS_PRICE_API_URL";
const BIND_ADDRESS_KEY: &str = "TXLENS_BIND_ADDRESS";
const REQUEST_TIMEOUT_KEY: &str = "TXLENS_REQUEST_TIMEOUT";
const USE_MOCK_DATA_KEY: &str = "USE_MOCK_DATA";
const MOCK_DATA_KEY: &str = "TXLENS_MOCK_DATA";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Esplora-compatible API base, e.g. https://mempool.space/api
    pub provider_url: String,
    pub price_api_url: String,
    pub bind_address: String,
    pub request_timeout_secs: u64,
    /// Serve fixtures only, never call the network
    pub use_mock_data: bool,
    /// Fixture file replacing the built-in example transactions
    pub mock_data_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider_url: DEFAULT_MEMPOOL_URL.to_string(),
            price_api_url: DEFAULT_PRICE_API_URL.to_string(),
            bind_address: DEFAULT_BIND_ADDR.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            use_mock_data: false,
            mock_data_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Config {
        let mut config = Config::default();
        config.apply_overrides(|key| env::var(key).ok());
        config
    }

    /// Read `path` when given, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Config::default(),
        };
        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path).map_err(|e| {
            TxLensError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Overlay values from `lookup`, which maps a variable name to its value
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(PROVIDER_URL_KEY) {
            self.provider_url = url;
        }
        if let Some(url) = lookup(PRICE_API_URL_KEY) {
            self.price_api_url = url;
        }
        if let Some(addr) = lookup(BIND_ADDRESS_KEY) {
            self.bind_address = addr;
        }
        if let Some(timeout) = lookup(REQUEST_TIMEOUT_KEY) {
            match timeout.parse::<u64>() {
                Ok(secs) if secs > 0 => self.request_timeout_secs = secs,
                _ => log::warn!("Ignoring invalid {REQUEST_TIMEOUT_KEY}={timeout}"),
            }
        }
        if let Some(flag) = lookup(USE_MOCK_DATA_KEY) {
            self.use_mock_data = flag == "1";
        }
        if let Some(path) = lookup(MOCK_DATA_KEY) {
            self.mock_data_path = Some(PathBuf::from(path));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.provider_url, "https://mempool.space/api");
        assert_eq!(config.price_api_url, "https://api.coingecko.com/api/v3");
        assert_eq!(config.bind_address, "127.0.0.1:3000");
        assert_eq!(config.request_timeout_secs, 10);
        assert!(!config.use_mock_data);
        assert_eq!(config.mock_data_path, None);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "provider_url = \"https://blockstream.info/api\"").unwrap();
        writeln!(file, "request_timeout_secs = 3").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.provider_url, "https://blockstream.info/api");
        assert_eq!(config.request_timeout_secs, 3);
        assert_eq!(config.bind_address, "127.0.0.1:3000");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "request_timeout_secs = \"soon\"").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, TxLensError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Config::from_file(Path::new("/nonexistent/txlens.toml")).unwrap_err();
        assert!(matches!(err, TxLensError::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(lookup_from(&[
            ("TXLENS_PROVIDER_URL", "http://localhost:8999/api"),
            ("TXLENS_BIND_ADDRESS", "0.0.0.0:8080"),
            ("TXLENS_REQUEST_TIMEOUT", "30"),
            ("USE_MOCK_DATA", "1"),
            ("TXLENS_MOCK_DATA", "/tmp/fixtures.json"),
        ]));

        assert_eq!(config.provider_url, "http://localhost:8999/api");
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.use_mock_data);
        assert_eq!(config.mock_data_path, Some(PathBuf::from("/tmp/fixtures.json")));
    }

    #[test]
    fn test_mock_flag_only_accepts_one() {
        let mut config = Config {
            use_mock_data: true,
            ..Config::default()
        };
        config.apply_overrides(lookup_from(&[("USE_MOCK_DATA", "true")]));
        assert!(!config.use_mock_data);
    }

    #[test]
    fn test_bad_timeout_ignored() {
        let mut config = Config::default();
        config.apply_overrides(lookup_from(&[("TXLENS_REQUEST_TIMEOUT", "0")]));
        assert_eq!(config.request_timeout_secs, 10);
    }
}
