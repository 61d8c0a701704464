use crate::error::{Result, TxLensError};
use serde::{Deserialize, Serialize};

/// Fee rate in satoshis per virtual byte
///
/// Always finite and strictly positive; fractional rates are allowed.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FeeRate(f64);

impl FeeRate {
    pub fn from_sat_per_vb(rate: f64) -> Result<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(TxLensError::InvalidInput(format!(
                "Fee rate must be a positive number of sat/vB, got {rate}"
            )));
        }
        Ok(Self(rate))
    }

    pub fn as_sat_per_vb(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for FeeRate {
    type Error = TxLensError;

    fn try_from(rate: f64) -> Result<Self> {
        Self::from_sat_per_vb(rate)
    }
}

impl From<FeeRate> for f64 {
    fn from(rate: FeeRate) -> f64 {
        rate.0
    }
}

impl std::fmt::Display for FeeRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} sat/vB", self.0)
    }
}

impl std::str::FromStr for FeeRate {
    type Err = TxLensError;

    fn from_str(s: &str) -> Result<Self> {
        let rate = s
            .trim()
            .parse::<f64>()
            .map_err(|_| TxLensError::InvalidInput(format!("Invalid fee rate: {s}")))?;
        Self::from_sat_per_vb(rate)
    }
}
