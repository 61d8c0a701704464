//! Remote data sources
//!
//! Everything that talks to the outside world lives here: the explorer API
//! adapter, its offline fixture twin, the price feed and the service that
//! picks between them. Responses are mapped into `core` types at this
//! boundary so nothing downstream sees raw API payloads.

pub mod mempool;
pub mod mock;
pub mod normalize;
pub mod price;
pub mod service;

use crate::core::transaction::{AddressSummary, Transaction};
use crate::error::Result;

pub use mempool::{MempoolProvider, DEFAULT_MEMPOOL_URL};
pub use mock::MockProvider;
pub use price::{PriceFeed, PricePoint, DEFAULT_PRICE_API_URL};
pub use service::ExplorerService;

/// Source of transaction and address data
///
/// A missing transaction or address is reported as `TxLensError::NotFound`.
/// Listing the transactions of an unknown address is not an error and
/// yields an empty list.
pub trait BtcProvider: Send + Sync {
    fn get_transaction(&self, txid: &str) -> Result<Transaction>;

    fn get_address(&self, address: &str) -> Result<AddressSummary>;

    fn get_address_transactions(&self, address: &str, limit: usize) -> Result<Vec<Transaction>>;
}
