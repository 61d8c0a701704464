use crate::config::Config;
use crate::error::{Result, TxLensError};
use crate::provider::{ExplorerService, PriceFeed};
use crate::storage::{RateLimitDecision, RateLimiter};
use crate::utils::validate::{parse_limit, validate_address, validate_txid};
use chrono::SecondsFormat;
use log::error;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

/// Requests per minute per client for transaction and address lookups
pub const LOOKUP_REQUESTS_PER_MINUTE: u32 = 30;
/// Requests per minute per client for price data
pub const PRICE_REQUESTS_PER_MINUTE: u32 = 60;

const UNKNOWN_CLIENT: &str = "unknown";

/// A parsed HTTP request, independent of the transport
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    headers: HashMap<String, String>,
}

impl ApiRequest {
    /// `target` is the request-target of the request line, query included
    pub fn new(method: &str, target: &str) -> ApiRequest {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (target, HashMap::new()),
        };
        ApiRequest {
            method: method.to_ascii_uppercase(),
            path: path.to_string(),
            query,
            headers: HashMap::new(),
        }
    }

    pub fn get(target: &str) -> ApiRequest {
        Self::new("GET", target)
    }

    pub fn with_header(mut self, name: &str, value: &str) -> ApiRequest {
        self.set_header(name, value);
        self
    }

    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers
            .insert(name.to_ascii_lowercase(), value.trim().to_string());
    }

    /// Header lookup, case-insensitive
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Client identity used for rate limiting
    pub fn client_id(&self) -> String {
        if let Some(first) = self
            .header("x-forwarded-for")
            .and_then(|list| list.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
        {
            return first.to_string();
        }
        match self.header("x-real-ip").filter(|ip| !ip.is_empty()) {
            Some(ip) => ip.to_string(),
            None => UNKNOWN_CLIENT.to_string(),
        }
    }
}

fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl ApiResponse {
    pub fn json<T: Serialize>(status: u16, body: &T) -> ApiResponse {
        match serde_json::to_value(body) {
            Ok(body) => ApiResponse {
                status,
                headers: Vec::new(),
                body,
            },
            Err(e) => {
                error!("Failed to serialize response body: {e}");
                Self::error(500, "Internal server error")
            }
        }
    }

    pub fn error(status: u16, message: &str) -> ApiResponse {
        ApiResponse {
            status,
            headers: Vec::new(),
            body: json!({ "error": message }),
        }
    }

    fn with_header(mut self, name: &str, value: String) -> ApiResponse {
        self.headers.push((name.to_string(), value));
        self
    }

    fn with_rate_limit(self, decision: &RateLimitDecision) -> ApiResponse {
        self.with_header("X-RateLimit-Limit", decision.limit.to_string())
            .with_header("X-RateLimit-Remaining", decision.remaining.to_string())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn reason(&self) -> &'static str {
        match self.status {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            405 => "Method Not Allowed",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            503 => "Service Unavailable",
            _ => "Unknown",
        }
    }
}

fn rate_limited(decision: &RateLimitDecision) -> ApiResponse {
    ApiResponse::json(
        429,
        &json!({
            "error": "Rate limit exceeded. Please try again later.",
            "retryAfter": decision.retry_after_secs,
        }),
    )
    .with_rate_limit(decision)
    .with_header(
        "X-RateLimit-Reset",
        decision
            .reset_time()
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    )
    .with_header("Retry-After", decision.retry_after_secs.to_string())
}

/// Everything a request handler needs, shared across connections
pub struct ApiState {
    explorer: ExplorerService,
    prices: PriceFeed,
    lookup_limiter: RateLimiter,
    price_limiter: RateLimiter,
}

impl ApiState {
    pub fn new(explorer: ExplorerService, prices: PriceFeed) -> ApiState {
        ApiState {
            explorer,
            prices,
            lookup_limiter: RateLimiter::per_minute(LOOKUP_REQUESTS_PER_MINUTE),
            price_limiter: RateLimiter::per_minute(PRICE_REQUESTS_PER_MINUTE),
        }
    }

    pub fn from_config(config: &Config) -> Result<ApiState> {
        let explorer = ExplorerService::from_config(config)?;
        let prices = PriceFeed::new(
            &config.price_api_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self::new(explorer, prices))
    }

    /// Replace the default quotas
    pub fn with_limits(mut self, lookup_per_minute: u32, price_per_minute: u32) -> ApiState {
        self.lookup_limiter = RateLimiter::per_minute(lookup_per_minute);
        self.price_limiter = RateLimiter::per_minute(price_per_minute);
        self
    }

    /// Drop expired rate-limit windows, returning how many were removed
    pub fn purge_rate_limits(&self) -> usize {
        self.lookup_limiter.purge_expired() + self.price_limiter.purge_expired()
    }

    pub fn handle(&self, request: &ApiRequest) -> ApiResponse {
        if request.method != "GET" {
            return ApiResponse::error(405, "Method not allowed")
                .with_header("Allow", "GET".to_string());
        }

        let segments: Vec<&str> = request
            .path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            ["api", "tx", txid] => self.transaction(request, txid),
            ["api", "address", address] => self.address(request, address),
            ["api", "address", address, "txs"] => self.address_transactions(request, address),
            ["api", "btc-price"] => self.btc_price(request),
            ["api", "btc-price-history"] => self.btc_price_history(request),
            _ => ApiResponse::error(404, "Not found"),
        }
    }

    fn transaction(&self, request: &ApiRequest, txid: &str) -> ApiResponse {
        let decision = self.lookup_limiter.check(&request.client_id());
        if !decision.allowed {
            return rate_limited(&decision);
        }
        let txid = match validate_txid(txid) {
            Ok(txid) => txid,
            Err(e) => return ApiResponse::error(400, &e.to_string()),
        };

        match self.explorer.transaction(&txid) {
            Ok(tx) => ApiResponse::json(200, &tx).with_rate_limit(&decision),
            Err(e) => lookup_failure(e, "Failed to fetch transaction"),
        }
    }

    fn address(&self, request: &ApiRequest, address: &str) -> ApiResponse {
        let decision = self.lookup_limiter.check(&request.client_id());
        if !decision.allowed {
            return rate_limited(&decision);
        }
        let address = match validate_address(address) {
            Ok(address) => address,
            Err(e) => return ApiResponse::error(400, &e.to_string()),
        };

        match self.explorer.address(&address) {
            Ok(summary) => ApiResponse::json(200, &summary).with_rate_limit(&decision),
            Err(e) => lookup_failure(e, "Failed to fetch address"),
        }
    }

    fn address_transactions(&self, request: &ApiRequest, address: &str) -> ApiResponse {
        let decision = self.lookup_limiter.check(&request.client_id());
        if !decision.allowed {
            return rate_limited(&decision);
        }
        let address = match validate_address(address) {
            Ok(address) => address,
            Err(e) => return ApiResponse::error(400, &e.to_string()),
        };
        let limit = match parse_limit(request.query.get("limit").map(String::as_str)) {
            Ok(limit) => limit,
            Err(e) => return ApiResponse::error(400, &e.to_string()),
        };

        match self.explorer.address_transactions(&address, limit) {
            Ok(txs) => ApiResponse::json(200, &txs).with_rate_limit(&decision),
            // Unknown address: empty listing rather than an error
            Err(e) if e.is_not_found() => ApiResponse::json(200, &json!([])),
            Err(e) => {
                error!("Error fetching address transactions: {e}");
                ApiResponse::error(500, "Failed to fetch address transactions")
            }
        }
    }

    fn btc_price(&self, request: &ApiRequest) -> ApiResponse {
        let decision = self.price_limiter.check(&request.client_id());
        if !decision.allowed {
            return rate_limited(&decision);
        }
        match self.prices.current_price() {
            Ok(price) => ApiResponse::json(200, &json!({ "price": price })).with_rate_limit(&decision),
            Err(TxLensError::PriceUnavailable(_)) => ApiResponse::error(503, "Price unavailable"),
            Err(e) => {
                error!("Error fetching BTC price: {e}");
                ApiResponse::error(500, "Failed to fetch price")
            }
        }
    }

    fn btc_price_history(&self, request: &ApiRequest) -> ApiResponse {
        let decision = self.price_limiter.check(&request.client_id());
        if !decision.allowed {
            return rate_limited(&decision);
        }
        match self.prices.price_history() {
            Ok(history) => {
                ApiResponse::json(200, &json!({ "history": history })).with_rate_limit(&decision)
            }
            Err(TxLensError::PriceUnavailable(_)) => {
                ApiResponse::error(503, "Price history unavailable")
            }
            Err(e) => {
                error!("Error fetching BTC price history: {e}");
                ApiResponse::error(500, "Failed to fetch price history")
            }
        }
    }
}

fn lookup_failure(err: TxLensError, fallback_message: &str) -> ApiResponse {
    if err.is_not_found() {
        return ApiResponse::error(404, &err.to_string());
    }
    error!("{fallback_message}: {err}");
    ApiResponse::error(500, fallback_message)
}
