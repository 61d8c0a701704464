//! Transaction size and fee estimation
//!
//! The playground uses a linear size model instead of serializing real
//! transactions:
//! - Overhead: 10 vbytes (version, locktime, counts)
//! - Input: 148 vbytes (legacy P2PKH spend)
//! - Output: 34 vbytes
//!
//! Fees are `ceil(vbytes * rate)` so the payer never underpays.

pub mod calculator;
pub mod rate;

pub use calculator::{
    estimate_vbytes, estimate_weight, fee_for_vbytes, FeeCalculator, ASSUMED_OUTPUT_COUNT,
    DEFAULT_ESTIMATED_VBYTES, INPUT_VBYTES, OUTPUT_VBYTES, TX_OVERHEAD_VBYTES,
};
pub use rate::FeeRate;
