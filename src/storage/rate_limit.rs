use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct WindowEntry {
    count: u32,
    reset_at: Instant,
}

/// Outcome of a rate-limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    #[serde(skip)]
    pub reset_at: Instant,
    /// Whole seconds until the window resets, rounded up
    pub retry_after_secs: u64,
}

impl RateLimitDecision {
    /// Wall-clock time at which the window resets
    pub fn reset_time(&self) -> DateTime<Utc> {
        self.reset_time_from(Instant::now(), Utc::now())
    }

    /// `reset_at` mapped onto the wall clock, given matching readings of both clocks
    pub fn reset_time_from(&self, now: Instant, wall_now: DateTime<Utc>) -> DateTime<Utc> {
        let remaining = self.reset_at.saturating_duration_since(now);
        chrono::Duration::from_std(remaining)
            .ok()
            .and_then(|delta| wall_now.checked_add_signed(delta))
            .unwrap_or(wall_now)
    }
}

/// Fixed-window request counter keyed by client identity
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    inner: Mutex<HashMap<String, WindowEntry>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> RateLimiter {
        RateLimiter {
            max_requests,
            window,
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// One-minute window
    pub fn per_minute(max_requests: u32) -> RateLimiter {
        Self::new(max_requests, Duration::from_secs(60))
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn check(&self, client_id: &str) -> RateLimitDecision {
        self.check_at(client_id, Instant::now())
    }

    pub fn check_at(&self, client_id: &str, now: Instant) -> RateLimitDecision {
        let key = format!("{client_id}:{}", self.window.as_millis());
        let mut table = match self.inner.lock() {
            Ok(table) => table,
            Err(_) => {
                log::error!("Failed to acquire rate limit lock, allowing request");
                return self.decision(true, self.max_requests, now + self.window, now);
            }
        };

        let entry = table.get_mut(&key);
        match entry {
            Some(entry) if now <= entry.reset_at => {
                if entry.count >= self.max_requests {
                    log::warn!("Rate limit exceeded for {client_id}");
                    return self.decision(false, 0, entry.reset_at, now);
                }
                entry.count += 1;
                let remaining = self.max_requests - entry.count;
                self.decision(true, remaining, entry.reset_at, now)
            }
            _ => {
                let reset_at = now + self.window;
                table.insert(key, WindowEntry { count: 1, reset_at });
                self.decision(true, self.max_requests.saturating_sub(1), reset_at, now)
            }
        }
    }

    /// Drop entries whose window has passed
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub fn purge_expired_at(&self, now: Instant) -> usize {
        match self.inner.lock() {
            Ok(mut table) => {
                let before = table.len();
                table.retain(|_, entry| now <= entry.reset_at);
                before - table.len()
            }
            Err(_) => {
                log::error!("Failed to acquire rate limit lock");
                0
            }
        }
    }

    pub fn len(&self) -> usize {
        match self.inner.lock() {
            Ok(table) => table.len(),
            Err(_) => {
                log::error!("Failed to acquire rate limit lock");
                0
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn decision(&self, allowed: bool, remaining: u32, reset_at: Instant, now: Instant) -> RateLimitDecision {
        let wait = reset_at.saturating_duration_since(now);
        let retry_after_secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
        RateLimitDecision {
            allowed,
            limit: self.max_requests,
            remaining,
            reset_at,
            retry_after_secs,
        }
    }
}
