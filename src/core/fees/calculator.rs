use crate::core::fees::rate::FeeRate;

/// Fixed per-transaction overhead in vbytes
pub const TX_OVERHEAD_VBYTES: u64 = 10;

/// Size of one input in vbytes
pub const INPUT_VBYTES: u64 = 148;

/// Size of one output in vbytes
pub const OUTPUT_VBYTES: u64 = 34;

/// Outputs assumed while selecting coins: recipient plus change
pub const ASSUMED_OUTPUT_COUNT: u64 = 2;

/// Initial size guess for a simple transaction
pub const DEFAULT_ESTIMATED_VBYTES: u64 = 250;

/// Estimate virtual size from input and output counts
///
/// Saturates at `u64::MAX` for absurd counts.
///
/// # Examples
/// ```
/// use txlens::core::fees::estimate_vbytes;
/// assert_eq!(estimate_vbytes(2, 2), 374);
/// ```
pub fn estimate_vbytes(input_count: u64, output_count: u64) -> u64 {
    TX_OVERHEAD_VBYTES
        .saturating_add(input_count.saturating_mul(INPUT_VBYTES))
        .saturating_add(output_count.saturating_mul(OUTPUT_VBYTES))
}

/// Weight units for a given virtual size
pub fn estimate_weight(vbytes: u64) -> u64 {
    vbytes.saturating_mul(4)
}

/// Fee for a given size, rounded up to the next whole satoshi
///
/// The float-to-int cast saturates, so huge sizes cap at `u64::MAX`.
pub fn fee_for_vbytes(vbytes: u64, rate: FeeRate) -> u64 {
    (vbytes as f64 * rate.as_sat_per_vb()).ceil() as u64
}

/// Fee calculator bound to a single fee rate
#[derive(Debug, Clone, Copy)]
pub struct FeeCalculator {
    rate: FeeRate,
}

impl FeeCalculator {
    pub fn new(rate: FeeRate) -> Self {
        Self { rate }
    }

    pub fn get_rate(&self) -> FeeRate {
        self.rate
    }

    /// Fee for a transaction with the given input and output counts
    pub fn fee_for(&self, input_count: u64, output_count: u64) -> u64 {
        fee_for_vbytes(estimate_vbytes(input_count, output_count), self.rate)
    }

    /// Fee used during coin selection, which always assumes a change output
    pub fn selection_fee(&self, input_count: u64) -> u64 {
        self.fee_for(input_count, ASSUMED_OUTPUT_COUNT)
    }
}
