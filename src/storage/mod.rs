//! In-memory stores for the service layer
//!
//! Both stores are shared across server threads behind `Arc` and guard their
//! maps with `std::sync` locks. Nothing is persisted.

pub mod cache;
pub mod rate_limit;

pub use cache::TtlCache;
pub use rate_limit::{RateLimitDecision, RateLimiter};
