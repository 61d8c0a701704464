//! BTC/USD price feed
//!
//! Prices come from the CoinGecko public API. Both the spot price and the
//! 24-hour history sit behind TTL caches; when CoinGecko fails, the last known
//! value is served instead, however old it is. A history request with nothing
//! cached falls back to hourly points around the spot price.

use crate::error::{Result, TxLensError};
use crate::storage::TtlCache;
use log::{info, warn};
use rand::Rng;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_PRICE_API_URL: &str = "https://api.coingecko.com/api/v3";

const PRICE_TTL: Duration = Duration::from_secs(60);
const HISTORY_TTL: Duration = Duration::from_secs(5 * 60);
pub const MAX_HISTORY_POINTS: usize = 24;

const HOUR_MS: i64 = 60 * 60 * 1000;
// Synthetic points stay within +/- 1% of the spot price
const SYNTHETIC_SPREAD: f64 = 0.02;

const PRICE_KEY: &str = "bitcoin/usd";
const HISTORY_KEY: &str = "bitcoin/usd/1d";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Unix timestamp in milliseconds
    pub time: i64,
    pub price: f64,
}

#[derive(Debug, Deserialize)]
struct SimplePriceResponse {
    bitcoin: Option<UsdQuote>,
}

#[derive(Debug, Deserialize)]
struct UsdQuote {
    usd: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    #[serde(default)]
    prices: Vec<(f64, f64)>,
}

pub struct PriceFeed {
    base_url: String,
    client: Client,
    price_cache: TtlCache<&'static str, f64>,
    history_cache: TtlCache<&'static str, Vec<PricePoint>>,
}

impl PriceFeed {
    pub fn new(base_url: &str, timeout: Duration) -> Result<PriceFeed> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TxLensError::Http(format!("Failed to build HTTP client: {e}")))?;
        Ok(PriceFeed {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            price_cache: TtlCache::new(PRICE_TTL),
            history_cache: TtlCache::new(HISTORY_TTL),
        })
    }

    /// Current BTC price in USD
    pub fn current_price(&self) -> Result<f64> {
        if let Some(price) = self.price_cache.get(&PRICE_KEY) {
            return Ok(price);
        }

        match self.fetch_price() {
            Ok(price) => {
                info!("BTC price updated: ${price:.2}");
                self.price_cache.insert(PRICE_KEY, price);
                Ok(price)
            }
            Err(e) => match self.price_cache.get_stale(&PRICE_KEY) {
                Some(price) => {
                    warn!("Failed to fetch BTC price ({e}), serving cached value");
                    Ok(price)
                }
                None => Err(TxLensError::PriceUnavailable(e.to_string())),
            },
        }
    }

    /// Last 24 hours of prices, sampled down to at most 24 points
    pub fn price_history(&self) -> Result<Vec<PricePoint>> {
        if let Some(history) = self.history_cache.get(&HISTORY_KEY) {
            return Ok(history);
        }

        match self.fetch_history() {
            Ok(history) => {
                self.history_cache.insert(HISTORY_KEY, history.clone());
                Ok(history)
            }
            Err(e) => match self.history_cache.get_stale(&HISTORY_KEY) {
                Some(history) => {
                    warn!("Failed to fetch price history ({e}), serving cached value");
                    Ok(history)
                }
                None => match self.current_price() {
                    Ok(price) => {
                        warn!("Failed to fetch price history ({e}), approximating from spot price");
                        Ok(synthetic_history(price, chrono::Utc::now().timestamp_millis()))
                    }
                    Err(_) => Err(TxLensError::PriceUnavailable(e.to_string())),
                },
            },
        }
    }

    fn fetch_price(&self) -> Result<f64> {
        let url = format!("{}/simple/price?ids=bitcoin&vs_currencies=usd", self.base_url);
        let response = self.client.get(url).send()?;
        if !response.status().is_success() {
            return Err(TxLensError::Http(format!(
                "CoinGecko returned {}",
                response.status()
            )));
        }
        let body: SimplePriceResponse = response.json()?;
        match body.bitcoin.and_then(|quote| quote.usd) {
            Some(price) if price > 0.0 => Ok(price),
            _ => Err(TxLensError::Parse("No BTC/USD quote in response".to_string())),
        }
    }

    fn fetch_history(&self) -> Result<Vec<PricePoint>> {
        let url = format!(
            "{}/coins/bitcoin/market_chart?vs_currency=usd&days=1",
            self.base_url
        );
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()?;
        if !response.status().is_success() {
            return Err(TxLensError::Http(format!(
                "CoinGecko returned {}",
                response.status()
            )));
        }
        let body: MarketChartResponse = response.json()?;
        if body.prices.is_empty() {
            return Err(TxLensError::Parse("Empty price history".to_string()));
        }

        let points: Vec<PricePoint> = body
            .prices
            .into_iter()
            .map(|(time, price)| PricePoint {
                time: time as i64,
                price,
            })
            .collect();
        Ok(sample_history(points, MAX_HISTORY_POINTS))
    }
}

/// Hourly points for the 24 hours before `now_ms`, jittered around `price`
///
/// Never cached: a later request retries CoinGecko.
pub fn synthetic_history(price: f64, now_ms: i64) -> Vec<PricePoint> {
    let mut rng = rand::thread_rng();
    (0..MAX_HISTORY_POINTS as i64)
        .map(|i| PricePoint {
            time: now_ms - (MAX_HISTORY_POINTS as i64 - i) * HOUR_MS,
            price: price + (rng.gen::<f64>() - 0.5) * price * SYNTHETIC_SPREAD,
        })
        .collect()
}

/// Evenly thin `points` down to at most `max_points`, keeping the last point
pub fn sample_history<T>(points: Vec<T>, max_points: usize) -> Vec<T> {
    if max_points == 0 || points.len() <= max_points {
        return points;
    }
    let step = points.len() / max_points;
    let last = points.len() - 1;
    points
        .into_iter()
        .enumerate()
        .filter(|(index, _)| index % step == 0 || *index == last)
        .map(|(_, point)| point)
        .take(max_points)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn feed(server: &mockito::ServerGuard) -> PriceFeed {
        PriceFeed::new(&server.url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_sample_history_small_input_untouched() {
        let points: Vec<u32> = (0..10).collect();
        assert_eq!(sample_history(points.clone(), 24), points);
    }

    #[test]
    fn test_sample_history_thins_evenly() {
        // 288 five-minute points in a day: step 12
        let points: Vec<usize> = (0..288).collect();
        let sampled = sample_history(points, 24);

        assert_eq!(sampled.len(), 24);
        assert_eq!(sampled[0], 0);
        assert_eq!(sampled[1], 12);
        assert_eq!(sampled[23], 276);
    }

    #[test]
    fn test_sample_history_keeps_last_when_room() {
        // step 2 over 50 points keeps 25 evens plus the last, truncated to 24
        let points: Vec<usize> = (0..50).collect();
        let sampled = sample_history(points, 24);
        assert_eq!(sampled.len(), 24);
        assert_eq!(sampled[23], 46);

        let points: Vec<usize> = (0..25).collect();
        let sampled = sample_history(points, 24);
        assert_eq!(sampled.len(), 24);
        assert_eq!(sampled[23], 23);
    }

    #[test]
    fn test_current_price_is_cached() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/simple/price")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"bitcoin": {"usd": 65000.5}}"#)
            .expect(1)
            .create();

        let feed = feed(&server);
        assert_eq!(feed.current_price().unwrap(), 65_000.5);
        assert_eq!(feed.current_price().unwrap(), 65_000.5);
        mock.assert();
    }

    #[test]
    fn test_price_unavailable_without_cache() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/simple/price")
            .match_query(Matcher::Any)
            .with_status(429)
            .create();

        let err = feed(&server).current_price().unwrap_err();
        assert!(matches!(err, TxLensError::PriceUnavailable(_)));
    }

    #[test]
    fn test_zero_price_is_rejected() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/simple/price")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"bitcoin": {"usd": 0}}"#)
            .create();

        assert!(feed(&server).current_price().is_err());
    }

    #[test]
    fn test_stale_price_served_on_failure() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/simple/price")
            .match_query(Matcher::Any)
            .with_status(500)
            .create();

        let feed = feed(&server);
        let earlier = std::time::Instant::now()
            .checked_sub(Duration::from_secs(120))
            .unwrap_or_else(std::time::Instant::now);
        feed.price_cache.insert_at(PRICE_KEY, 61_000.0, earlier);

        assert_eq!(feed.current_price().unwrap(), 61_000.0);
    }

    #[test]
    fn test_price_history_sampled() {
        let prices: Vec<String> = (0..100)
            .map(|i| format!("[{}, {}.0]", 1_700_000_000_000i64 + i * 864_000, 60_000 + i))
            .collect();
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/coins/bitcoin/market_chart")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("vs_currency".into(), "usd".into()),
                Matcher::UrlEncoded("days".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(format!(r#"{{"prices": [{}]}}"#, prices.join(",")))
            .create();

        let history = feed(&server).price_history().unwrap();
        assert_eq!(history.len(), 24);
        assert_eq!(history[0].time, 1_700_000_000_000);
        assert_eq!(history[0].price, 60_000.0);
        assert_eq!(history[1].price, 60_004.0);
    }

    #[test]
    fn test_synthetic_history_shape() {
        let now = 1_700_000_000_000;
        let history = synthetic_history(50_000.0, now);

        assert_eq!(history.len(), MAX_HISTORY_POINTS);
        assert_eq!(history[0].time, now - 24 * HOUR_MS);
        assert_eq!(history[23].time, now - HOUR_MS);
        assert!(history.windows(2).all(|w| w[1].time - w[0].time == HOUR_MS));
        assert!(history
            .iter()
            .all(|p| (49_500.0..=50_500.0).contains(&p.price)));
    }

    #[test]
    fn test_history_falls_back_to_spot_price() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/coins/bitcoin/market_chart")
            .match_query(Matcher::Any)
            .with_status(429)
            .create();
        server
            .mock("GET", "/simple/price")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"bitcoin": {"usd": 40000.0}}"#)
            .create();

        let feed = feed(&server);
        let history = feed.price_history().unwrap();
        assert_eq!(history.len(), 24);
        assert!(history
            .iter()
            .all(|p| (39_600.0..=40_400.0).contains(&p.price)));
        // Approximations are not cached
        assert!(feed.history_cache.get_stale(&HISTORY_KEY).is_none());
    }

    #[test]
    fn test_empty_history_is_unavailable() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/coins/bitcoin/market_chart")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"prices": []}"#)
            .create();

        let err = feed(&server).price_history().unwrap_err();
        assert!(matches!(err, TxLensError::PriceUnavailable(_)));
    }
}
