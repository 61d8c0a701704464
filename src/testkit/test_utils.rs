//! Test utilities for building transactions and wallets

use crate::core::transaction::{Transaction, TxInput, TxOutput, TxStatus, Utxo};

pub const SENDER_ADDRESS: &str = "bc1qsender";
pub const RECIPIENT_ADDRESS: &str = "bc1qrecipient";
pub const CHANGE_ADDRESS: &str = "bc1qchange";
pub const SAMPLE_TXID: &str = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";

/// Build an unconfirmed transaction from (address, value) pairs
pub fn transaction_with(inputs: &[(Option<&str>, u64)], outputs: &[(Option<&str>, u64)]) -> Transaction {
    let vin: Vec<TxInput> = inputs
        .iter()
        .map(|(address, value)| TxInput::new(*address, *value))
        .collect();
    let vout: Vec<TxOutput> = outputs
        .iter()
        .enumerate()
        .map(|(n, (address, value))| TxOutput::new(*address, *value, n as u32))
        .collect();

    let inputs_total: u64 = inputs.iter().map(|(_, v)| v).sum();
    let outputs_total: u64 = outputs.iter().map(|(_, v)| v).sum();

    Transaction {
        txid: SAMPLE_TXID.to_string(),
        fee_sats: inputs_total.saturating_sub(outputs_total),
        size_vbytes: None,
        weight: None,
        status: TxStatus::Unconfirmed,
        vin,
        vout,
    }
}

/// One input from the sender, one output to the recipient
pub fn simple_transaction(input_sats: u64, output_sats: u64) -> Transaction {
    transaction_with(
        &[(Some(SENDER_ADDRESS), input_sats)],
        &[(Some(RECIPIENT_ADDRESS), output_sats)],
    )
}

/// Wallet used by the largest-first scenarios: 0.1, 0.05 and 0.025 BTC
pub fn small_wallet() -> Vec<Utxo> {
    vec![
        Utxo::new("abc123", 0, "bc1qwallet1", 10_000_000),
        Utxo::new("def456", 1, "bc1qwallet1", 5_000_000),
        Utxo::new("ghi789", 0, "bc1qwallet1", 2_500_000),
    ]
}

/// Same values as `small_wallet` in a shuffled order
pub fn shuffled_small_wallet() -> Vec<Utxo> {
    vec![
        Utxo::new("ghi789", 0, "bc1qwallet1", 2_500_000),
        Utxo::new("abc123", 0, "bc1qwallet1", 10_000_000),
        Utxo::new("def456", 1, "bc1qwallet1", 5_000_000),
    ]
}
