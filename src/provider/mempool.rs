use crate::core::transaction::{AddressSummary, Transaction};
use crate::error::{Result, TxLensError};
use crate::provider::normalize::{map_address, map_transaction, ProviderAddress, ProviderTx};
use crate::provider::BtcProvider;
use log::{debug, info};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use std::time::Duration;

pub const DEFAULT_MEMPOOL_URL: &str = "https://mempool.space/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Esplora-compatible explorer client (mempool.space by default)
#[derive(Debug, Clone)]
pub struct MempoolProvider {
    base_url: String,
    client: Client,
}

impl MempoolProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<MempoolProvider> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TxLensError::Http(format!("Failed to build HTTP client: {e}")))?;
        Ok(MempoolProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {url}");
        Ok(self.client.get(url).send()?)
    }
}

// Non-success statuses other than 404 become Http errors carrying the reason
fn upstream_error(what: &str, status: StatusCode) -> TxLensError {
    TxLensError::Http(format!(
        "Failed to fetch {what}: {}",
        status.canonical_reason().unwrap_or(status.as_str())
    ))
}

impl BtcProvider for MempoolProvider {
    fn get_transaction(&self, txid: &str) -> Result<Transaction> {
        info!("Fetching transaction {txid}");
        let response = self.get(&format!("/tx/{txid}"))?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(TxLensError::NotFound(format!("Transaction {txid}"))),
            status if !status.is_success() => Err(upstream_error("transaction", status)),
            _ => {
                let raw: ProviderTx = response.json()?;
                Ok(map_transaction(raw))
            }
        }
    }

    fn get_address(&self, address: &str) -> Result<AddressSummary> {
        info!("Fetching address {address}");
        let response = self.get(&format!("/address/{address}"))?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(TxLensError::NotFound(format!("Address {address}"))),
            status if !status.is_success() => Err(upstream_error("address", status)),
            _ => {
                let raw: ProviderAddress = response.json()?;
                Ok(map_address(raw))
            }
        }
    }

    fn get_address_transactions(&self, address: &str, limit: usize) -> Result<Vec<Transaction>> {
        info!("Fetching up to {limit} transactions for {address}");
        let response = self.get(&format!("/address/{address}/txs?limit={limit}"))?;
        match response.status() {
            // Unknown address: nothing to list
            StatusCode::NOT_FOUND => Ok(Vec::new()),
            status if !status.is_success() => Err(upstream_error("address transactions", status)),
            _ => {
                let raw: Vec<ProviderTx> = response.json()?;
                Ok(raw.into_iter().map(map_transaction).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction::TxStatus;
    use mockito::Matcher;

    const TXID: &str = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";
    const ADDRESS: &str = "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq";

    fn provider(server: &mockito::ServerGuard) -> MempoolProvider {
        MempoolProvider::new(&server.url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_get_transaction() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", format!("/tx/{TXID}").as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "txid": "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b",
                    "fee": 0,
                    "size": 204,
                    "weight": 816,
                    "status": {"confirmed": true, "block_height": 0, "block_time": 1231006505},
                    "vin": [{"is_coinbase": true, "prevout": null}],
                    "vout": [{"scriptpubkey_address": "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", "value": 5000000000}]
                }"#,
            )
            .create();

        let tx = provider(&server).get_transaction(TXID).unwrap();
        mock.assert();

        assert_eq!(tx.txid, TXID);
        assert_eq!(tx.vout[0].value_sats, 5_000_000_000);
        assert_eq!(tx.vin[0].value_sats(), 0);
        assert!(matches!(tx.status, TxStatus::Confirmed { block_height: 0, .. }));
    }

    #[test]
    fn test_transaction_not_found() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", format!("/tx/{TXID}").as_str())
            .with_status(404)
            .with_body("Transaction not found")
            .create();

        let err = provider(&server).get_transaction(TXID).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), format!("Transaction {TXID} not found"));
    }

    #[test]
    fn test_upstream_failure_is_http_error() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", format!("/address/{ADDRESS}").as_str())
            .with_status(503)
            .create();

        let err = provider(&server).get_address(ADDRESS).unwrap_err();
        assert!(matches!(err, TxLensError::Http(_)));
        assert!(err.to_string().contains("Failed to fetch address"));
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", format!("/tx/{TXID}").as_str())
            .with_status(200)
            .with_body("not json")
            .create();

        let err = provider(&server).get_transaction(TXID).unwrap_err();
        assert!(matches!(err, TxLensError::Parse(_)));
    }

    #[test]
    fn test_get_address() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", format!("/address/{ADDRESS}").as_str())
            .with_status(200)
            .with_body(format!(
                r#"{{"address": "{ADDRESS}",
                    "chain_stats": {{"funded_txo_sum": 300, "spent_txo_sum": 100, "tx_count": 3}},
                    "mempool_stats": {{"funded_txo_sum": 0, "spent_txo_sum": 50, "tx_count": 1}}}}"#
            ))
            .create();

        let summary = provider(&server).get_address(ADDRESS).unwrap();
        assert_eq!(summary.balance_sats, Some(150));
        assert_eq!(summary.tx_count, Some(4));
    }

    #[test]
    fn test_address_transactions_passes_limit() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", format!("/address/{ADDRESS}/txs").as_str())
            .match_query(Matcher::UrlEncoded("limit".into(), "5".into()))
            .with_status(200)
            .with_body(r#"[{"txid": "aa", "status": {"confirmed": false}, "vin": [], "vout": []}]"#)
            .create();

        let txs = provider(&server).get_address_transactions(ADDRESS, 5).unwrap();
        mock.assert();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].txid, "aa");
    }

    #[test]
    fn test_address_transactions_404_is_empty() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", format!("/address/{ADDRESS}/txs").as_str())
            .match_query(Matcher::Any)
            .with_status(404)
            .create();

        let txs = provider(&server).get_address_transactions(ADDRESS, 25).unwrap();
        assert!(txs.is_empty());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let provider = MempoolProvider::new("https://example.org/api/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(provider.base_url(), "https://example.org/api");
    }
}
