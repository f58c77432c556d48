//! Parsed-query caching.
//!
//! Provides an LRU cache with TTL expiration mapping normalised query text
//! to its [`StructuredQuery`]. Result sets are never cached: every
//! evaluation reads the index.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;
use snomed_query_ecl::StructuredQuery;

use crate::config::ParseCacheConfig;

/// A cached query with expiration tracking.
#[derive(Debug, Clone)]
struct CacheEntry {
    query: StructuredQuery,
    created_at: Instant,
}

impl CacheEntry {
    fn new(query: StructuredQuery) -> Self {
        Self {
            query,
            created_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

/// Thread-safe LRU cache with TTL expiration for parsed queries.
///
/// - **LRU Eviction**: When the cache is full, the least recently used entry is evicted.
/// - **TTL Expiration**: Entries expire after the configured time-to-live.
/// - **Thread-Safe**: Uses a `parking_lot::Mutex` around the LRU.
///
/// # Example
///
/// ```rust
/// use snomed_query_engine::{ParseCache, ParseCacheConfig};
/// use snomed_query_ecl::parse_query;
///
/// let cache = ParseCache::new(ParseCacheConfig::default());
/// let query = parse_query("<< 73211009").unwrap();
///
/// cache.set("<< 73211009".to_string(), query.clone());
/// assert_eq!(cache.get("<< 73211009"), Some(query));
/// ```
pub struct ParseCache {
    inner: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl ParseCache {
    /// Creates a new cache with the given configuration.
    pub fn new(config: ParseCacheConfig) -> Self {
        Self::with_capacity(config.max_entries, config.ttl)
    }

    /// Creates a cache with custom capacity and TTL.
    ///
    /// A capacity of 0 is treated as 1.
    pub fn with_capacity(max_entries: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Gets a cached query by key.
    ///
    /// Returns `None` if the key is absent or its entry has expired. On a
    /// hit the entry is promoted to most-recently-used.
    pub fn get(&self, key: &str) -> Option<StructuredQuery> {
        let mut cache = self.inner.lock();

        if let Some(entry) = cache.get(key) {
            if entry.is_expired(self.ttl) {
                cache.pop(key);
                return None;
            }
            return Some(entry.query.clone());
        }

        None
    }

    /// Stores a query in the cache.
    pub fn set(&self, key: String, query: StructuredQuery) {
        self.inner.lock().put(key, CacheEntry::new(query));
    }

    /// Checks if a key exists in the cache (without affecting LRU order).
    ///
    /// Expiration is not checked.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().contains(key)
    }

    /// Returns the number of entries, including expired ones not yet removed.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all entries from the cache.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Removes expired entries from the cache.
    pub fn cleanup_expired(&self) {
        let mut cache = self.inner.lock();
        let expired_keys: Vec<String> = cache
            .iter()
            .filter(|(_, entry)| entry.is_expired(self.ttl))
            .map(|(key, _)| key.clone())
            .collect();

        for key in expired_keys {
            cache.pop(&key);
        }
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let cache = self.inner.lock();
        let total = cache.len();
        let expired = cache
            .iter()
            .filter(|(_, entry)| entry.is_expired(self.ttl))
            .count();

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            valid_entries: total.saturating_sub(expired),
        }
    }
}

impl std::fmt::Debug for ParseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("ParseCache")
            .field("entries", &stats.total_entries)
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Statistics about the cache state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Total number of entries in the cache.
    pub total_entries: usize,
    /// Number of expired entries (not yet cleaned up).
    pub expired_entries: usize,
    /// Number of valid (non-expired) entries.
    pub valid_entries: usize,
}

/// Normalises a query string for consistent cache keys.
///
/// Collapses runs of whitespace to one space and trims both ends.
///
/// ```rust
/// use snomed_query_engine::normalize_cache_key;
///
/// assert_eq!(normalize_cache_key("  <<  73211009 "), "<< 73211009");
/// ```
pub fn normalize_cache_key(query: &str) -> String {
    let mut result = String::with_capacity(query.len());
    let mut prev_was_space = true; // Start true to trim leading spaces

    for ch in query.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }

    if result.ends_with(' ') {
        result.pop();
    }

    result
}
