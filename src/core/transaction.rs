// Transaction data model shared by the normalizer, the graph builder and the playground
// Amounts are integer satoshis; addresses are optional because some scripts have none

use serde::{Deserialize, Serialize};

// An unspent output a wallet can spend: "output #1 of transaction ABC is worth N sats"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    pub txid: String,    // Transaction that created this output
    pub vout: u32,       // Index of the output in that transaction
    pub address: String, // Address that controls the output
    pub value_sats: u64, // Indivisible amount locked in the output
}

impl Utxo {
    pub fn new(txid: &str, vout: u32, address: &str, value_sats: u64) -> Utxo {
        Utxo {
            txid: txid.to_string(),
            vout,
            address: address.to_string(),
            value_sats,
        }
    }
}

// The previous output an input spends
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prevout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub value_sats: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vout: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    pub prevout: Prevout,
}

impl TxInput {
    pub fn new(address: Option<&str>, value_sats: u64) -> TxInput {
        TxInput {
            prevout: Prevout {
                address: address.map(str::to_string),
                value_sats,
                txid: None,
                vout: None,
            },
        }
    }

    // An input carrying the full reference to the output it spends
    pub fn spending(utxo: &Utxo) -> TxInput {
        TxInput {
            prevout: Prevout {
                address: Some(utxo.address.clone()),
                value_sats: utxo.value_sats,
                txid: Some(utxo.txid.clone()),
                vout: Some(utxo.vout),
            },
        }
    }

    pub fn address(&self) -> Option<&str> {
        self.prevout.address.as_deref()
    }

    pub fn value_sats(&self) -> u64 {
        self.prevout.value_sats
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub value_sats: u64,
    pub n: u32, // Output index (0-based)
}

impl TxOutput {
    pub fn new(address: Option<&str>, value_sats: u64, n: u32) -> TxOutput {
        TxOutput {
            address: address.map(str::to_string),
            value_sats,
            n,
        }
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}

/// Confirmation state of a transaction
///
/// Block fields only exist on the `Confirmed` variant. On the wire this is an
/// object with a `confirmed` flag, matching the explorer API shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StatusRepr", into = "StatusRepr")]
pub enum TxStatus {
    Unconfirmed,
    Confirmed {
        block_height: u64,
        block_time: i64, // Unix timestamp in seconds
        confirmations: u64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StatusRepr {
    confirmed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    block_height: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    block_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confirmations: Option<u64>,
}

impl TryFrom<StatusRepr> for TxStatus {
    type Error = String;

    fn try_from(repr: StatusRepr) -> std::result::Result<Self, Self::Error> {
        if !repr.confirmed {
            return Ok(TxStatus::Unconfirmed);
        }
        match (repr.block_height, repr.block_time) {
            (Some(block_height), Some(block_time)) => Ok(TxStatus::Confirmed {
                block_height,
                block_time,
                confirmations: repr.confirmations.unwrap_or(0),
            }),
            _ => Err("confirmed status requires block_height and block_time".to_string()),
        }
    }
}

impl From<TxStatus> for StatusRepr {
    fn from(status: TxStatus) -> Self {
        match status {
            TxStatus::Unconfirmed => StatusRepr {
                confirmed: false,
                block_height: None,
                block_time: None,
                confirmations: None,
            },
            TxStatus::Confirmed {
                block_height,
                block_time,
                confirmations,
            } => StatusRepr {
                confirmed: true,
                block_height: Some(block_height),
                block_time: Some(block_time),
                confirmations: Some(confirmations),
            },
        }
    }
}

impl TxStatus {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, TxStatus::Confirmed { .. })
    }
}

// A transaction as the rest of the crate sees it, whichever source it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub txid: String,
    pub fee_sats: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_vbytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u64>,
    pub status: TxStatus,
    #[serde(default)]
    pub vin: Vec<TxInput>,
    #[serde(default)]
    pub vout: Vec<TxOutput>,
}

impl Transaction {
    pub fn get_vin(&self) -> &[TxInput] {
        self.vin.as_slice()
    }

    pub fn get_vout(&self) -> &[TxOutput] {
        self.vout.as_slice()
    }
}

/// Balance and activity summary for one address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSummary {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_sats: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_count: Option<u64>,
}
