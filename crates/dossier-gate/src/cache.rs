//! TTL + capacity-bounded response cache over normalized queries.
//!
//! Keys are the hex SHA-256 digest of the lowercased, trimmed query, so
//! `" What is Rust? "` and `"what is rust?"` share an entry. Expiry is lazy:
//! entries past the TTL are treated as absent on read and removed. When an
//! insert pushes the store past capacity, expired entries go first, then the
//! oldest-inserted.
//!
//! Hit/miss counters feed the `/stats` endpoint and are reset only by
//! [`ResponseCache::clear`], which also empties the store.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

/// Derive the cache key for a query: SHA-256 over the normalized text.
#[must_use]
pub fn cache_key(query: &str) -> String {
    let normalized = query.trim().to_lowercase();
    let digest = Sha256::digest(normalized.as_bytes());
    format!("{digest:x}")
}

struct CacheEntry {
    payload: Value,
    inserted: Instant,
    /// ISO-8601 insertion time, echoed back as `cached_at` on hits.
    timestamp: String,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    /// Keys in insertion order, for oldest-first eviction.
    insertion_order: VecDeque<String>,
    hits: u64,
    misses: u64,
    total_requests: u64,
}

/// Content-addressed, time-bounded response cache.
pub struct ResponseCache {
    ttl: Duration,
    max_entries: usize,
    inner: Mutex<CacheInner>,
}

/// Statistics snapshot for the `/stats` endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct CacheStats {
    /// Live entry count.
    pub cache_size: usize,
    /// Configured capacity.
    pub max_size: usize,
    /// Configured TTL in seconds.
    pub ttl_seconds: u64,
    /// `get` calls since the last clear.
    pub total_requests: u64,
    /// Hits since the last clear.
    pub cache_hits: u64,
    /// Misses since the last clear.
    pub cache_misses: u64,
    /// Hit rate, formatted `"{:.2}%"`.
    pub hit_rate: String,
}

impl ResponseCache {
    /// Create a cache with the given TTL and capacity.
    #[must_use]
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries,
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                insertion_order: VecDeque::new(),
                hits: 0,
                misses: 0,
                total_requests: 0,
            }),
        }
    }

    /// Look up a query. On a hit the stored payload is returned with
    /// `cached: true` and `cached_at` set to the insertion timestamp.
    #[must_use]
    pub fn get(&self, query: &str) -> Option<Value> {
        let key = cache_key(query);
        let mut inner = self.inner.lock();
        inner.total_requests += 1;

        // Lazy expiry.
        let expired = inner
            .entries
            .get(&key)
            .is_some_and(|e| e.inserted.elapsed() >= self.ttl);
        if expired {
            let _ = inner.entries.remove(&key);
            inner.insertion_order.retain(|k| k != &key);
        }

        let found = inner
            .entries
            .get(&key)
            .map(|entry| (entry.payload.clone(), entry.timestamp.clone()));
        match found {
            Some((mut payload, timestamp)) => {
                if let Value::Object(ref mut map) = payload {
                    let _ = map.insert("cached".into(), Value::Bool(true));
                    let _ = map.insert("cached_at".into(), Value::String(timestamp));
                }
                inner.hits += 1;
                debug!(key = %key, "cache hit");
                Some(payload)
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    /// Store a payload for a query, stamping it `cached: false` with the
    /// insertion timestamp. Returns the stamped payload.
    pub fn put(&self, query: &str, mut payload: Value) -> Value {
        let key = cache_key(query);
        let timestamp = chrono::Local::now().to_rfc3339();
        if let Value::Object(ref mut map) = payload {
            let _ = map.insert("cached".into(), Value::Bool(false));
            let _ = map.insert("timestamp".into(), Value::String(timestamp.clone()));
        }

        let mut inner = self.inner.lock();

        // Re-inserting an existing key refreshes its slot; the old entry
        // must go too so capacity eviction never counts it against live
        // entries.
        if inner.entries.remove(&key).is_some() {
            inner.insertion_order.retain(|k| k != &key);
        }

        self.evict_excess(&mut inner);

        let _ = inner.entries.insert(
            key.clone(),
            CacheEntry {
                payload: payload.clone(),
                inserted: Instant::now(),
                timestamp,
            },
        );
        inner.insertion_order.push_back(key);
        payload
    }

    /// Drop expired entries, then oldest-inserted, until there is room for
    /// one more entry.
    fn evict_excess(&self, inner: &mut CacheInner) {
        let expired: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, e)| e.inserted.elapsed() >= self.ttl)
            .map(|(k, _)| k.clone())
            .collect();
        for key in expired {
            let _ = inner.entries.remove(&key);
            inner.insertion_order.retain(|k| k != &key);
        }

        while inner.entries.len() >= self.max_entries {
            let Some(oldest) = inner.insertion_order.pop_front() else {
                break;
            };
            let _ = inner.entries.remove(&oldest);
        }
    }

    /// Statistics snapshot.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        #[allow(clippy::cast_precision_loss)]
        let hit_rate = if inner.total_requests > 0 {
            inner.hits as f64 / inner.total_requests as f64 * 100.0
        } else {
            0.0
        };
        CacheStats {
            cache_size: inner.entries.len(),
            max_size: self.max_entries,
            ttl_seconds: self.ttl.as_secs(),
            total_requests: inner.total_requests,
            cache_hits: inner.hits,
            cache_misses: inner.misses,
            hit_rate: format!("{hit_rate:.2}%"),
        }
    }

    /// Empty the store and reset all counters.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.insertion_order.clear();
        inner.hits = 0;
        inner.misses = 0;
        inner.total_requests = 0;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cache() -> ResponseCache {
        ResponseCache::new(Duration::from_secs(300), 100)
    }

    #[test]
    fn key_is_case_and_whitespace_insensitive() {
        assert_eq!(cache_key("  What is Rust?  "), cache_key("what is rust?"));
        assert_eq!(cache_key("QUERY"), cache_key("query"));
        assert_ne!(cache_key("query a"), cache_key("query b"));
    }

    #[test]
    fn get_after_put_hits_with_cached_flag() {
        let cache = cache();
        let _ = cache.put("my query", json!({"research": "findings"}));
        let hit = cache.get("my query").unwrap();
        assert_eq!(hit["research"], "findings");
        assert_eq!(hit["cached"], true);
        assert!(hit["cached_at"].is_string());
    }

    #[test]
    fn put_stamps_cached_false() {
        let cache = cache();
        let stored = cache.put("q", json!({"a": 1}));
        assert_eq!(stored["cached"], false);
        assert!(stored["timestamp"].is_string());
    }

    #[test]
    fn normalized_queries_share_an_entry() {
        let cache = cache();
        let _ = cache.put("What Is Rust?", json!({"a": 1}));
        assert!(cache.get("  what is rust?  ").is_some());
    }

    #[test]
    fn miss_on_unknown_query() {
        let cache = cache();
        assert!(cache.get("never stored").is_none());
    }

    #[test]
    fn entries_expire_after_ttl() {
        let cache = ResponseCache::new(Duration::from_millis(10), 100);
        let _ = cache.put("q", json!({"a": 1}));
        std::thread::sleep(Duration::from_millis(15));
        assert!(cache.get("q").is_none());
        // The expired entry was removed, not just hidden.
        assert_eq!(cache.stats().cache_size, 0);
    }

    #[test]
    fn capacity_evicts_oldest_inserted() {
        let cache = ResponseCache::new(Duration::from_secs(300), 2);
        let _ = cache.put("first", json!({"n": 1}));
        let _ = cache.put("second", json!({"n": 2}));
        let _ = cache.put("third", json!({"n": 3}));
        assert!(cache.get("first").is_none());
        assert!(cache.get("second").is_some());
        assert!(cache.get("third").is_some());
    }

    #[test]
    fn refreshing_a_key_at_capacity_keeps_other_entries() {
        let cache = ResponseCache::new(Duration::from_secs(300), 3);
        let _ = cache.put("a", json!({"n": 1}));
        let _ = cache.put("b", json!({"n": 2}));
        let _ = cache.put("c", json!({"n": 3}));

        // A refresh replaces in place; it must not evict a live neighbor.
        let _ = cache.put("a", json!({"n": 4}));
        assert_eq!(cache.get("a").unwrap()["n"], 4);
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
        assert_eq!(cache.stats().cache_size, 3);
    }

    #[test]
    fn refreshed_key_moves_to_back_of_eviction_order() {
        let cache = ResponseCache::new(Duration::from_secs(300), 2);
        let _ = cache.put("a", json!({"n": 1}));
        let _ = cache.put("b", json!({"n": 2}));
        let _ = cache.put("a", json!({"n": 3}));
        // "b" is now the oldest insertion and goes first.
        let _ = cache.put("c", json!({"n": 4}));
        assert!(cache.get("b").is_none());
        assert!(cache.get("a").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn stats_track_hits_and_misses() {
        let cache = cache();
        let _ = cache.put("q", json!({"a": 1}));
        let _ = cache.get("q");
        let _ = cache.get("q");
        let _ = cache.get("other");
        let stats = cache.stats();
        assert_eq!(stats.total_requests, 3);
        assert_eq!(stats.cache_hits, 2);
        assert_eq!(stats.cache_misses, 1);
        assert_eq!(stats.hit_rate, "66.67%");
        assert_eq!(stats.cache_size, 1);
    }

    #[test]
    fn stats_with_no_requests() {
        let stats = cache().stats();
        assert_eq!(stats.total_requests, 0);
        assert_eq!(stats.hit_rate, "0.00%");
    }

    #[test]
    fn clear_empties_store_and_counters() {
        let cache = cache();
        let _ = cache.put("q", json!({"a": 1}));
        let _ = cache.get("q");
        cache.clear();
        let stats = cache.stats();
        assert_eq!(stats.cache_size, 0);
        assert_eq!(stats.total_requests, 0);
        assert_eq!(stats.cache_hits, 0);
        assert!(cache.get("q").is_none());
    }

    #[test]
    fn reinsert_refreshes_existing_entry() {
        let cache = ResponseCache::new(Duration::from_secs(300), 2);
        let _ = cache.put("a", json!({"v": 1}));
        let _ = cache.put("b", json!({"v": 2}));
        let _ = cache.put("a", json!({"v": 3}));
        // "a" was refreshed, so adding a third key evicts "b" (now oldest).
        let _ = cache.put("c", json!({"v": 4}));
        assert_eq!(cache.get("a").unwrap()["v"], 3);
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
    }
}
