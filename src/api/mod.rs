//! JSON HTTP API
//!
//! `handlers` holds the transport-free request handling (rate limiting,
//! validation, lookups and status mapping) so it can be tested without
//! sockets. `server` wraps it in a minimal HTTP/1.1 listener.

pub mod handlers;
pub mod server;

pub use handlers::{
    ApiRequest, ApiResponse, ApiState, LOOKUP_REQUESTS_PER_MINUTE, PRICE_REQUESTS_PER_MINUTE,
};
pub use server::ApiServer;
