// Playground transaction builder
// Turns a coin selection into a transaction shaped like a real one so the
// normalizer, graph builder and tables can render it unchanged

use crate::core::coin_selection::{select_utxos, SelectionError};
use crate::core::fees::{estimate_vbytes, estimate_weight, FeeRate};
use crate::core::transaction::{Transaction, TxInput, TxOutput, TxStatus, Utxo};
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

// Placeholder id for a simulation that could not be built
pub const PENDING_SIM_TXID: &str = "simulated-tx-pending";

const SIM_TXID_PREFIX: &str = "sim-";
const SIM_SUFFIX_LEN: usize = 8;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimTxParams {
    pub utxos: Vec<Utxo>,
    pub send_amount_sats: i64,
    pub recipient_address: String,
    pub change_address: String,
    pub fee_rate: FeeRate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatedTransaction {
    pub tx: Transaction,
    pub selected: Vec<Utxo>,
    pub fee_sats: u64,
    pub change_sats: u64,
    pub can_send: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SelectionError>,
}

// Txids of simulated transactions are never 64-hex, so they cannot be
// mistaken for (or collide with) a real transaction id
pub fn generate_sim_txid() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SIM_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{SIM_TXID_PREFIX}{millis}-{suffix}")
}

pub fn is_simulated_txid(txid: &str) -> bool {
    txid == PENDING_SIM_TXID || txid.starts_with(SIM_TXID_PREFIX)
}

/// Build a simulated transaction from the selector's answer
///
/// Inputs are the selected coins. Outputs are the payment plus change when
/// change is non-zero.
pub fn build_sim_tx(params: &SimTxParams) -> SimulatedTransaction {
    let selection = select_utxos(&params.utxos, params.send_amount_sats, params.fee_rate);

    if !selection.can_send {
        return SimulatedTransaction {
            tx: Transaction {
                txid: PENDING_SIM_TXID.to_string(),
                fee_sats: selection.fee_sats,
                size_vbytes: None,
                weight: None,
                status: TxStatus::Unconfirmed,
                vin: Vec::new(),
                vout: Vec::new(),
            },
            selected: selection.selected,
            fee_sats: selection.fee_sats,
            change_sats: 0,
            can_send: false,
            error: selection.error,
        };
    }

    let vin: Vec<TxInput> = selection.selected.iter().map(TxInput::spending).collect();

    // can_send guarantees a positive amount
    let mut vout = vec![TxOutput::new(
        Some(&params.recipient_address),
        params.send_amount_sats as u64,
        0,
    )];
    // Zero change means no change output: never synthesize a dust output
    if selection.change_sats > 0 {
        vout.push(TxOutput::new(
            Some(&params.change_address),
            selection.change_sats,
            1,
        ));
    }

    let size_vbytes = estimate_vbytes(vin.len() as u64, vout.len() as u64);
    let tx = Transaction {
        txid: generate_sim_txid(),
        fee_sats: selection.fee_sats,
        size_vbytes: Some(size_vbytes),
        weight: Some(estimate_weight(size_vbytes)),
        status: TxStatus::Unconfirmed,
        vin,
        vout,
    };
    info!(
        "Simulated {} with {} inputs and {} outputs",
        tx.txid,
        tx.vin.len(),
        tx.vout.len()
    );

    SimulatedTransaction {
        tx,
        selected: selection.selected,
        fee_sats: selection.fee_sats,
        change_sats: selection.change_sats,
        can_send: true,
        error: None,
    }
}
