//! Mapping of raw explorer API payloads into the crate's data model
//!
//! Esplora-style APIs (mempool.space, blockstream.info) report amounts in
//! satoshis and omit fields freely: coinbase inputs carry no `prevout`,
//! unconfirmed transactions carry no block fields and some outputs have no
//! address. Every field is therefore optional here and defaults are applied
//! when mapping.

use crate::core::transaction::{AddressSummary, Prevout, Transaction, TxInput, TxOutput, TxStatus};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderStatus {
    #[serde(default)]
    pub confirmed: bool,
    pub block_height: Option<u64>,
    pub block_time: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderPrevout {
    pub scriptpubkey_address: Option<String>,
    pub value: Option<u64>,
    pub txid: Option<String>,
    pub vout: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderVin {
    pub prevout: Option<ProviderPrevout>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderVout {
    pub scriptpubkey_address: Option<String>,
    pub value: Option<u64>,
    pub n: Option<u32>,
}

/// Raw `/tx/{txid}` response (also the element type of `/address/{addr}/txs`)
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderTx {
    pub txid: String,
    pub fee: Option<u64>,
    pub size: Option<u64>,
    pub weight: Option<u64>,
    #[serde(default)]
    pub status: ProviderStatus,
    #[serde(default)]
    pub vin: Vec<ProviderVin>,
    #[serde(default)]
    pub vout: Vec<ProviderVout>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ProviderStats {
    #[serde(default)]
    pub funded_txo_sum: u64,
    #[serde(default)]
    pub spent_txo_sum: u64,
    #[serde(default)]
    pub tx_count: u64,
}

/// Raw `/address/{addr}` response
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderAddress {
    pub address: String,
    #[serde(default)]
    pub chain_stats: ProviderStats,
    #[serde(default)]
    pub mempool_stats: ProviderStats,
}

fn map_input(input: ProviderVin) -> TxInput {
    // Coinbase inputs have no prevout: value 0, no address
    let prevout = input.prevout.unwrap_or_default();
    TxInput {
        prevout: Prevout {
            address: prevout.scriptpubkey_address,
            value_sats: prevout.value.unwrap_or(0),
            txid: prevout.txid,
            vout: prevout.vout,
        },
    }
}

fn map_output(index: usize, output: ProviderVout) -> TxOutput {
    TxOutput {
        address: output.scriptpubkey_address,
        value_sats: output.value.unwrap_or(0),
        n: output.n.unwrap_or(index as u32),
    }
}

fn map_status(status: &ProviderStatus) -> TxStatus {
    match (status.confirmed, status.block_height, status.block_time) {
        (true, Some(block_height), Some(block_time)) => TxStatus::Confirmed {
            block_height,
            block_time,
            // Needs the chain tip, which this payload does not carry
            confirmations: 0,
        },
        _ => TxStatus::Unconfirmed,
    }
}

pub fn map_transaction(raw: ProviderTx) -> Transaction {
    let status = map_status(&raw.status);
    let vin: Vec<TxInput> = raw.vin.into_iter().map(map_input).collect();
    let vout: Vec<TxOutput> = raw
        .vout
        .into_iter()
        .enumerate()
        .map(|(index, output)| map_output(index, output))
        .collect();

    let fee_sats = match raw.fee {
        Some(fee) if fee > 0 => fee,
        _ => {
            let inputs_total: u64 = vin.iter().map(TxInput::value_sats).sum();
            let outputs_total: u64 = vout.iter().map(|o| o.value_sats).sum();
            inputs_total.saturating_sub(outputs_total)
        }
    };

    Transaction {
        txid: raw.txid,
        fee_sats,
        size_vbytes: raw.size,
        weight: raw.weight,
        status,
        vin,
        vout,
    }
}

pub fn map_address(raw: ProviderAddress) -> AddressSummary {
    let funded = raw.chain_stats.funded_txo_sum + raw.mempool_stats.funded_txo_sum;
    let spent = raw.chain_stats.spent_txo_sum + raw.mempool_stats.spent_txo_sum;

    AddressSummary {
        address: raw.address,
        balance_sats: Some(funded.saturating_sub(spent)),
        tx_count: Some(raw.chain_stats.tx_count + raw.mempool_stats.tx_count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_tx(value: serde_json::Value) -> Transaction {
        map_transaction(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_confirmed_transaction() {
        let tx = parse_tx(json!({
            "txid": "aa",
            "fee": 1_500,
            "size": 225,
            "weight": 900,
            "status": { "confirmed": true, "block_height": 800_000, "block_time": 1_690_000_000 },
            "vin": [{ "prevout": { "scriptpubkey_address": "bc1qin", "value": 101_500 } }],
            "vout": [
                { "scriptpubkey_address": "bc1qout", "value": 60_000 },
                { "scriptpubkey_address": "bc1qchange", "value": 40_000 }
            ]
        }));

        assert_eq!(tx.fee_sats, 1_500);
        assert_eq!(tx.size_vbytes, Some(225));
        assert_eq!(tx.weight, Some(900));
        assert_eq!(
            tx.status,
            TxStatus::Confirmed {
                block_height: 800_000,
                block_time: 1_690_000_000,
                confirmations: 0
            }
        );
        assert_eq!(tx.vin[0].address(), Some("bc1qin"));
        assert_eq!(tx.vout[1].n, 1);
        assert_eq!(tx.vout[1].address(), Some("bc1qchange"));
    }

    #[test]
    fn test_coinbase_input_and_missing_fields() {
        let tx = parse_tx(json!({
            "txid": "cb",
            "status": { "confirmed": false },
            "vin": [{ "is_coinbase": true }],
            "vout": [{ "value": 625_000_000 }, { "scriptpubkey_address": "bc1qx" }]
        }));

        assert_eq!(tx.vin[0].value_sats(), 0);
        assert_eq!(tx.vin[0].address(), None);
        assert_eq!(tx.vout[0].address(), None);
        assert_eq!(tx.vout[1].value_sats, 0);
        assert_eq!(tx.status, TxStatus::Unconfirmed);
        // no provider fee and outputs exceed inputs: clamped
        assert_eq!(tx.fee_sats, 0);
    }

    #[test]
    fn test_fee_computed_when_missing_or_zero() {
        for fee in [json!(null), json!(0)] {
            let tx = parse_tx(json!({
                "txid": "ff",
                "fee": fee,
                "status": { "confirmed": false },
                "vin": [{ "prevout": { "value": 10_000 } }],
                "vout": [{ "value": 9_000 }]
            }));
            assert_eq!(tx.fee_sats, 1_000);
        }
    }

    #[test]
    fn test_confirmed_without_block_fields_is_unconfirmed() {
        let tx = parse_tx(json!({
            "txid": "odd",
            "status": { "confirmed": true, "block_height": 1 }
        }));
        assert_eq!(tx.status, TxStatus::Unconfirmed);
        assert!(tx.vin.is_empty());
    }

    #[test]
    fn test_output_index_falls_back_to_position() {
        let tx = parse_tx(json!({
            "txid": "nn",
            "vout": [{ "value": 1, "n": 7 }, { "value": 2 }]
        }));
        assert_eq!(tx.vout[0].n, 7);
        assert_eq!(tx.vout[1].n, 1);
    }

    #[test]
    fn test_address_balance_combines_chain_and_mempool() {
        let raw: ProviderAddress = serde_json::from_value(json!({
            "address": "bc1qaddr",
            "chain_stats": { "funded_txo_sum": 500_000, "spent_txo_sum": 200_000, "tx_count": 4 },
            "mempool_stats": { "funded_txo_sum": 10_000, "spent_txo_sum": 0, "tx_count": 1 }
        }))
        .unwrap();
        let summary = map_address(raw);

        assert_eq!(summary.address, "bc1qaddr");
        assert_eq!(summary.balance_sats, Some(310_000));
        assert_eq!(summary.tx_count, Some(5));
    }

    #[test]
    fn test_address_without_stats() {
        let raw: ProviderAddress = serde_json::from_value(json!({ "address": "bc1qempty" })).unwrap();
        let summary = map_address(raw);
        assert_eq!(summary.balance_sats, Some(0));
        assert_eq!(summary.tx_count, Some(0));
    }
}
