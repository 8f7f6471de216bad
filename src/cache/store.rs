//! TTL response cache backed by a concurrent map.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::http::response::ResponseData;
use crate::observability::metrics;

/// A cached response payload with its absolute expiry.
#[derive(Debug, Clone)]
struct CacheEntry {
    data: ResponseData,
    expires_at: Instant,
}

/// A thread-safe response cache with per-entry TTL expiration.
///
/// Cloning produces another handle to the same underlying map, so a cache
/// can be shared between clients or kept per-client for isolation.
#[derive(Clone)]
pub struct ResponseCache {
    inner: Arc<DashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Look up a non-expired entry.
    ///
    /// An expired entry is removed on lookup and never returned.
    pub fn get(&self, key: &str) -> Option<ResponseData> {
        if let Some(entry) = self.inner.get(key) {
            if entry.expires_at > Instant::now() {
                metrics::record_cache_hit();
                return Some(entry.data.clone());
            }
            drop(entry);
            self.inner.remove(key);
            metrics::record_cache_size(self.inner.len());
        }
        metrics::record_cache_miss();
        None
    }

    /// Store a payload under `key`, overwriting any previous entry.
    pub fn insert(&self, key: String, data: ResponseData) {
        self.inner.insert(
            key,
            CacheEntry {
                data,
                expires_at: Instant::now() + self.ttl,
            },
        );
        metrics::record_cache_size(self.inner.len());
    }

    /// Remove a single entry.
    pub fn invalidate(&self, key: &str) {
        self.inner.remove(key);
        metrics::record_cache_size(self.inner.len());
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.inner.clear();
        metrics::record_cache_size(0);
    }

    /// Number of entries currently held, including any not yet purged.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The configured entry lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("entries", &self.inner.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(v: u64) -> ResponseData {
        ResponseData::Json(json!({ "value": v }))
    }

    #[test]
    fn test_insert_and_get() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.insert("GET:/products:".to_string(), payload(1));

        let hit = cache.get("GET:/products:").unwrap();
        assert_eq!(hit, payload(1));
        assert!(cache.get("GET:/missing:").is_none());
    }

    #[test]
    fn test_expired_entry_is_purged_not_served() {
        let cache = ResponseCache::new(Duration::from_millis(20));
        cache.insert("GET:/products:".to_string(), payload(1));

        std::thread::sleep(Duration::from_millis(40));

        assert!(cache.get("GET:/products:").is_none());
        // Lazy purge removed the entry on lookup
        assert!(cache.is_empty());
    }

    #[test]
    fn test_overwrite_wins() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.insert("k".to_string(), payload(1));
        cache.insert("k".to_string(), payload(2));
        assert_eq!(cache.get("k").unwrap(), payload(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_single_key() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.insert("GET:/products:".to_string(), payload(1));
        cache.insert("GET:/profile:".to_string(), payload(2));

        cache.invalidate("GET:/products:");

        assert!(cache.get("GET:/products:").is_none());
        assert!(cache.get("GET:/profile:").is_some());
    }

    #[test]
    fn test_clear_all() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.insert("a".to_string(), payload(1));
        cache.insert("b".to_string(), payload(2));

        cache.clear();

        assert!(cache.is_empty());
    }

    #[test]
    fn test_shared_handles_see_same_entries() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let other = cache.clone();
        cache.insert("k".to_string(), payload(7));
        assert_eq!(other.get("k").unwrap(), payload(7));
    }
}
