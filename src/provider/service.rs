use crate::config::Config;
use crate::core::transaction::{AddressSummary, Transaction};
use crate::error::{Result, TxLensError};
use crate::provider::mempool::MempoolProvider;
use crate::provider::mock::MockProvider;
use crate::provider::BtcProvider;
use log::{debug, info};
use std::time::Duration;

/// Lookup front for the CLI and the HTTP API
///
/// Example transactions shipped as fixtures are always answered locally. In
/// mock mode there is no remote provider at all and addresses come back empty.
pub struct ExplorerService {
    remote: Option<Box<dyn BtcProvider>>,
    fixtures: MockProvider,
}

impl ExplorerService {
    pub fn new(remote: Box<dyn BtcProvider>, fixtures: MockProvider) -> ExplorerService {
        ExplorerService {
            remote: Some(remote),
            fixtures,
        }
    }

    pub fn mock_only(fixtures: MockProvider) -> ExplorerService {
        ExplorerService {
            remote: None,
            fixtures,
        }
    }

    pub fn from_config(config: &Config) -> Result<ExplorerService> {
        let fixtures = match &config.mock_data_path {
            Some(path) => MockProvider::from_file(path)?,
            None => MockProvider::builtin()?,
        };
        if config.use_mock_data {
            info!("Mock data mode: serving {} fixture transactions", fixtures.txids().len());
            return Ok(Self::mock_only(fixtures));
        }
        let remote = MempoolProvider::new(
            &config.provider_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self::new(Box::new(remote), fixtures))
    }

    pub fn is_mock(&self) -> bool {
        self.remote.is_none()
    }

    pub fn fixtures(&self) -> &MockProvider {
        &self.fixtures
    }

    pub fn transaction(&self, txid: &str) -> Result<Transaction> {
        if let Some(tx) = self.fixtures.lookup(txid) {
            debug!("Serving {txid} from fixtures");
            return Ok(tx.clone());
        }
        match &self.remote {
            Some(remote) => remote.get_transaction(txid),
            None => Err(TxLensError::NotFound(format!("Transaction {txid}"))),
        }
    }

    pub fn address(&self, address: &str) -> Result<AddressSummary> {
        match &self.remote {
            Some(remote) => remote.get_address(address),
            None => self.fixtures.get_address(address),
        }
    }

    pub fn address_transactions(&self, address: &str, limit: usize) -> Result<Vec<Transaction>> {
        match &self.remote {
            Some(remote) => remote.get_address_transactions(address, limit),
            None => self.fixtures.get_address_transactions(address, limit),
        }
    }
}
