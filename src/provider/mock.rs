use crate::core::transaction::{AddressSummary, Transaction};
use crate::error::{Result, TxLensError};
use crate::provider::BtcProvider;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

// Genesis coinbase and the block 170 payment, keyed by txid
const BUILTIN_FIXTURES: &str = include_str!("../../data/mock_transactions.json");

/// Offline provider backed by a txid -> transaction fixture map
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    transactions: HashMap<String, Transaction>,
}

impl MockProvider {
    pub fn new(transactions: Vec<Transaction>) -> MockProvider {
        let transactions = transactions
            .into_iter()
            .map(|tx| (tx.txid.clone(), tx))
            .collect();
        MockProvider { transactions }
    }

    pub fn builtin() -> Result<MockProvider> {
        Self::from_json(BUILTIN_FIXTURES)
    }

    pub fn from_json(json: &str) -> Result<MockProvider> {
        let transactions: HashMap<String, Transaction> = serde_json::from_str(json)?;
        Ok(MockProvider { transactions })
    }

    pub fn from_file(path: &Path) -> Result<MockProvider> {
        let json = fs::read_to_string(path)
            .map_err(|e| TxLensError::Io(format!("Failed to read {}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    pub fn contains(&self, txid: &str) -> bool {
        self.transactions.contains_key(txid)
    }

    pub fn lookup(&self, txid: &str) -> Option<&Transaction> {
        self.transactions.get(txid)
    }

    /// Fixture txids in sorted order
    pub fn txids(&self) -> Vec<&str> {
        let mut txids: Vec<&str> = self.transactions.keys().map(String::as_str).collect();
        txids.sort_unstable();
        txids
    }
}

impl BtcProvider for MockProvider {
    fn get_transaction(&self, txid: &str) -> Result<Transaction> {
        self.lookup(txid)
            .cloned()
            .ok_or_else(|| TxLensError::NotFound(format!("Transaction {txid}")))
    }

    fn get_address(&self, address: &str) -> Result<AddressSummary> {
        Ok(AddressSummary {
            address: address.to_string(),
            balance_sats: Some(0),
            tx_count: Some(0),
        })
    }

    fn get_address_transactions(&self, _address: &str, _limit: usize) -> Result<Vec<Transaction>> {
        Ok(Vec::new())
    }
}
