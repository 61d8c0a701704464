//! Core explorer functionality
//!
//! Pure, synchronous building blocks: the transaction data model,
//! normalization, graph building, input classification, fee estimation and the
//! playground coin selector. Nothing in here performs I/O.

pub mod classify;
pub mod coin_selection;
pub mod fees;
pub mod graph;
pub mod monetary;
pub mod normalize;
pub mod simulation;
pub mod transaction;

pub use classify::{detect_input_type, is_likely_btc_address, is_likely_txid, InputKind};
pub use coin_selection::{select_utxos, select_utxos_with_estimate, CoinSelection, SelectionError};
pub use fees::{estimate_vbytes, fee_for_vbytes, FeeCalculator, FeeRate};
pub use graph::{build_graph, EdgeKind, GraphData, GraphEdge, GraphNode, NodeKind};
pub use monetary::SATS_PER_BTC;
pub use normalize::{
    calculate_confirmations, normalize_transaction, verify_fee, FeeCheck, NormalizedTransaction,
};
pub use simulation::{build_sim_tx, SimTxParams, SimulatedTransaction, PENDING_SIM_TXID};
pub use transaction::{AddressSummary, Prevout, Transaction, TxInput, TxOutput, TxStatus, Utxo};
