use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;
use std::time::{Duration, Instant};

struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Cache with a fixed time-to-live per entry
///
/// Expired entries are evicted when read through [`TtlCache::get`], but stay
/// reachable via [`TtlCache::get_stale`] until overwritten or purged so callers
/// can fall back to the last known value when the upstream is down.
pub struct TtlCache<K, V> {
    ttl: Duration,
    inner: RwLock<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> TtlCache<K, V> {
        TtlCache {
            ttl,
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn insert(&self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn insert_at(&self, key: K, value: V, now: Instant) {
        match self.inner.write() {
            Ok(mut cache) => {
                cache.insert(
                    key,
                    CacheEntry {
                        value,
                        stored_at: now,
                    },
                );
            }
            Err(_) => {
                log::error!("Failed to acquire write lock on cache");
            }
        }
    }

    /// Fresh value for `key`, evicting it if expired
    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        match self.inner.read() {
            Ok(cache) => match cache.get(key) {
                Some(entry) if !self.is_expired(entry, now) => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            },
            Err(_) => {
                log::error!("Failed to acquire read lock on cache");
                return None;
            }
        }

        // Expired: evict outside the read guard
        match self.inner.write() {
            Ok(mut cache) => {
                if cache
                    .get(key)
                    .is_some_and(|entry| self.is_expired(entry, now))
                {
                    cache.remove(key);
                }
            }
            Err(_) => {
                log::error!("Failed to acquire write lock on cache");
            }
        }
        None
    }

    /// Last stored value regardless of age
    pub fn get_stale(&self, key: &K) -> Option<V> {
        match self.inner.read() {
            Ok(cache) => cache.get(key).map(|entry| entry.value.clone()),
            Err(_) => {
                log::error!("Failed to acquire read lock on cache");
                None
            }
        }
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub fn purge_expired_at(&self, now: Instant) -> usize {
        match self.inner.write() {
            Ok(mut cache) => {
                let before = cache.len();
                cache.retain(|_, entry| !self.is_expired(entry, now));
                before - cache.len()
            }
            Err(_) => {
                log::error!("Failed to acquire write lock on cache");
                0
            }
        }
    }

    pub fn len(&self) -> usize {
        match self.inner.read() {
            Ok(cache) => cache.len(),
            Err(_) => {
                log::error!("Failed to acquire read lock on cache");
                0
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_expired(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        now.saturating_duration_since(entry.stored_at) >= self.ttl
    }
}
