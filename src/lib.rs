//! # txlens - an educational Bitcoin transaction explorer
//!
//! txlens looks up real transactions and addresses, checks the arithmetic
//! behind them and lets you build pretend transactions from sample wallets.
//!
//! ## Layout
//! - `core/`: data model, normalization, graph building, fee estimation and
//!   the greedy coin selector. Pure and synchronous.
//! - `provider/`: mempool.space client, bundled fixtures, the CoinGecko
//!   price feed and the service that chooses between them
//! - `storage/`: TTL cache and fixed-window rate limiter
//! - `api/`: JSON HTTP API over a minimal threaded server
//! - `content/`: glossary with term auto-linking, playground wallets and the
//!   guided tour and quiz
//! - `config/`: TOML file plus environment overrides
//! - `utils/`: input validation and address redaction
//! - `cli/`: argument parsing and text rendering for the binary
//!
//! Amounts are integer satoshis everywhere; BTC strings only appear at the
//! edges when something is displayed.

pub mod api;
pub mod cli;
pub mod config;
pub mod content;
pub mod core;
pub mod error;
pub mod provider;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub mod testkit;

pub use api::{ApiRequest, ApiResponse, ApiServer, ApiState};
pub use cli::{Command, Opt};
pub use config::{Config, GLOBAL_CONFIG};
pub use content::{
    auto_link, chapters, find_chapter, find_scenario, glossary, glossary_entry, grade_quiz,
    parse_answers, quiz_questions, scenarios, search_glossary, Chapter, GlossaryEntry,
    QuizQuestion, QuizResult, Scenario, Segment, Tour,
};
pub use core::{
    build_graph, build_sim_tx, calculate_confirmations, detect_input_type, estimate_vbytes,
    normalize_transaction, select_utxos, verify_fee, AddressSummary, CoinSelection, FeeCheck,
    FeeRate, GraphData, InputKind, NormalizedTransaction, SelectionError, SimTxParams,
    SimulatedTransaction, Transaction, TxInput, TxOutput, TxStatus, Utxo,
};
pub use error::{Result, TxLensError};
pub use provider::{BtcProvider, ExplorerService, MempoolProvider, MockProvider, PriceFeed};
pub use storage::{RateLimiter, TtlCache};
pub use utils::validate::{MAX_INPUT_LENGTH, MAX_TX_LIMIT};
pub use utils::{
    parse_limit, redact_address, validate_address, validate_string_input, validate_txid,
};
