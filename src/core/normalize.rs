//! Transaction normalization
//!
//! Derives the totals a reader needs to "verify the math" of a transaction:
//! the fee is always the residual `inputs - outputs`, never taken on trust.

use crate::core::transaction::{Transaction, TxInput, TxOutput};
use serde::{Deserialize, Serialize};

/// Read-only view of a transaction with precomputed totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    pub inputs_total_sats: u64,
    pub outputs_total_sats: u64,
    /// Signed: outputs exceeding inputs yields a negative fee
    pub fee_sats: i64,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
}

/// Outcome of comparing a computed fee with a reported one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeeCheck {
    Consistent,
    Mismatch { calculated: i64, reported: i64 },
    Negative { calculated: i64 },
}

impl FeeCheck {
    pub fn is_consistent(&self) -> bool {
        matches!(self, FeeCheck::Consistent)
    }
}

/// Compute aggregate totals and the residual fee
pub fn normalize_transaction(tx: &Transaction) -> NormalizedTransaction {
    let inputs_total_sats: u64 = tx.vin.iter().map(TxInput::value_sats).sum();
    let outputs_total_sats: u64 = tx.vout.iter().map(|output| output.value_sats).sum();
    let fee_sats = inputs_total_sats as i64 - outputs_total_sats as i64;

    NormalizedTransaction {
        inputs_total_sats,
        outputs_total_sats,
        fee_sats,
        inputs: tx.vin.clone(),
        outputs: tx.vout.clone(),
    }
}

/// Compare the normalized fee against a provider-reported fee
///
/// A negative computed fee takes precedence over a mismatch.
pub fn verify_fee(normalized: &NormalizedTransaction, reported_fee_sats: i64) -> FeeCheck {
    let calculated = normalized.inputs_total_sats as i64 - normalized.outputs_total_sats as i64;
    if calculated < 0 {
        FeeCheck::Negative { calculated }
    } else if calculated != reported_fee_sats {
        FeeCheck::Mismatch {
            calculated,
            reported: reported_fee_sats,
        }
    } else {
        FeeCheck::Consistent
    }
}

/// Confirmation count for a transaction mined at `block_height`
///
/// Without a known chain tip the transaction counts as one confirmation.
pub fn calculate_confirmations(block_height: Option<u64>, tip_height: Option<u64>) -> Option<u64> {
    let height = block_height?;
    match tip_height {
        None => Some(1),
        Some(tip) if tip >= height => Some(tip - height + 1),
        Some(_) => Some(0),
    }
}
