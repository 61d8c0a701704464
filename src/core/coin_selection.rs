//! Greedy largest-first coin selection for the playground
//!
//! Selection runs in two passes: a rough fee estimate decides how many UTXOs
//! to grab, then the fee is recomputed for the coins actually selected. The
//! fee always assumes two outputs (recipient and change), even when the
//! resulting change is zero and only one output is built.

use crate::core::fees::{FeeCalculator, FeeRate, DEFAULT_ESTIMATED_VBYTES};
use crate::core::monetary::conversions::format_btc_fixed;
use crate::core::transaction::Utxo;
use log::debug;
use serde::{Deserialize, Serialize};

/// Why a selection cannot be sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionError {
    /// Requested amount was zero or negative
    InvalidAmount,
    /// Selected coins cannot cover amount plus fee
    InsufficientFunds { required: u64, available: u64 },
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionError::InvalidAmount => write!(f, "Send amount must be greater than 0"),
            SelectionError::InsufficientFunds {
                required,
                available,
            } => write!(
                f,
                "Insufficient funds. Need {} BTC but only have {} BTC available.",
                format_btc_fixed(i64::try_from(*required).unwrap_or(i64::MAX)),
                format_btc_fixed(i64::try_from(*available).unwrap_or(i64::MAX))
            ),
        }
    }
}

impl std::error::Error for SelectionError {}

/// Result of a coin selection run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinSelection {
    pub selected: Vec<Utxo>,
    pub total_selected_sats: u64,
    pub fee_sats: u64,
    pub change_sats: u64,
    pub can_send: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SelectionError>,
}

impl CoinSelection {
    fn invalid_amount() -> Self {
        Self {
            selected: Vec::new(),
            total_selected_sats: 0,
            fee_sats: 0,
            change_sats: 0,
            can_send: false,
            error: Some(SelectionError::InvalidAmount),
        }
    }

    /// Human-readable error message, if the selection failed
    pub fn error_message(&self) -> Option<String> {
        self.error.map(|e| e.to_string())
    }
}

/// Select UTXOs covering `send_amount_sats` plus fee at `fee_rate`
pub fn select_utxos(utxos: &[Utxo], send_amount_sats: i64, fee_rate: FeeRate) -> CoinSelection {
    select_utxos_with_estimate(utxos, send_amount_sats, fee_rate, DEFAULT_ESTIMATED_VBYTES)
}

/// Same as [`select_utxos`] with an explicit initial size guess
///
/// The guess is only advisory; the reported fee always comes from the
/// selected input count.
pub fn select_utxos_with_estimate(
    utxos: &[Utxo],
    send_amount_sats: i64,
    fee_rate: FeeRate,
    estimated_vbytes: u64,
) -> CoinSelection {
    if send_amount_sats <= 0 {
        return CoinSelection::invalid_amount();
    }
    let send_amount = send_amount_sats as u64;
    let calculator = FeeCalculator::new(fee_rate);

    // Stable sort keeps the original order among equal values
    let mut sorted: Vec<&Utxo> = utxos.iter().collect();
    sorted.sort_by(|a, b| b.value_sats.cmp(&a.value_sats));

    let provisional_inputs = match sorted.first() {
        Some(largest) if largest.value_sats > 0 => send_amount.div_ceil(largest.value_sats).max(1),
        _ => 1,
    };
    let estimated_fee = calculator.selection_fee(provisional_inputs);
    let target = send_amount.saturating_add(estimated_fee);
    debug!(
        "Selecting coins: send {send_amount} sats, rate {fee_rate}, initial guess {estimated_vbytes} vB, \
         provisional inputs {provisional_inputs}, target {target} sats"
    );

    let mut selected = Vec::new();
    let mut total_selected: u64 = 0;
    for utxo in sorted {
        selected.push(utxo.clone());
        total_selected = total_selected.saturating_add(utxo.value_sats);
        if total_selected >= target {
            break;
        }
    }

    let actual_fee = calculator.selection_fee(selected.len() as u64);
    let required = send_amount.saturating_add(actual_fee);
    debug!(
        "Selected {} coins worth {total_selected} sats, fee {actual_fee} sats",
        selected.len()
    );

    if total_selected < required {
        return CoinSelection {
            selected,
            total_selected_sats: total_selected,
            fee_sats: actual_fee,
            change_sats: 0,
            can_send: false,
            error: Some(SelectionError::InsufficientFunds {
                required,
                available: total_selected,
            }),
        };
    }

    CoinSelection {
        selected,
        total_selected_sats: total_selected,
        fee_sats: actual_fee,
        change_sats: total_selected - required,
        can_send: true,
        error: None,
    }
}
