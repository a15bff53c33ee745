//! Caching layer for station directory lookups.
//!
//! The directory rarely changes, so a free-text query that resolved once
//! (to a station, or cleanly to nothing) is remembered for a day. Failed
//! lookups are never cached.

use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::Station;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
            max_capacity: 1000,
        }
    }
}

/// Cache of resolved station queries, keyed by normalized query text.
///
/// `None` values record a query the directory had no match for.
#[derive(Clone)]
pub struct ResolutionCache {
    entries: MokaCache<String, Option<Station>>,
}

impl ResolutionCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let entries = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { entries }
    }

    /// Normalize a query into a cache key (trimmed, lowercased).
    pub fn key(query: &str) -> String {
        query.trim().to_lowercase()
    }

    /// Get a cached resolution. The outer `Option` is the cache hit.
    pub async fn get(&self, query: &str) -> Option<Option<Station>> {
        self.entries.get(&Self::key(query)).await
    }

    /// Remember a resolution.
    pub async fn insert(&self, query: &str, station: Option<Station>) {
        self.entries.insert(Self::key(query), station).await;
    }
}
