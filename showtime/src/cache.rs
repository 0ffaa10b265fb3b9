//! Read-through cache for city listings.
//!
//! Keyed by location, entries live for a fixed TTL measured against the
//! injected [`Clock`]. There is no per-key invalidation: any sale clears the
//! whole cache, which keeps the invariant simple (a sale is never followed by
//! a stale listing).
//!
//! Concurrent misses for the same location may both compute; the last write wins.
//!
//! Every write prunes expired entries first. If the cache is still at its
//! entry cap, the entry closest to expiry is evicted.

use crate::listing::ShowSummary;
use crate::metrics;
use chrono::{DateTime, Utc};
use serde::Serialize;
use showtime_core::environment::Clock;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default cap on stored locations.
pub const DEFAULT_MAX_ENTRIES: usize = 500;

/// Whether a lookup was served from the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CacheStatus {
    /// Served from a live entry
    Hit,
    /// Computed and stored
    Miss,
}

impl CacheStatus {
    /// `HIT` or `MISS`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Miss => "MISS",
        }
    }
}

/// Result of [`ListingCache::get_or_compute`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedListing {
    /// Hit or miss
    pub status: CacheStatus,
    /// The listing
    pub shows: Vec<ShowSummary>,
}

/// Lookup counters, for tests and diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from a live entry
    pub hits: u64,
    /// Lookups that had to compute
    pub misses: u64,
    /// Entries currently stored (live or expired)
    pub entries: usize,
}

#[derive(Debug)]
struct Entry {
    shows: Vec<ShowSummary>,
    expires_at: DateTime<Utc>,
}

/// In-process listing cache.
pub struct ListingCache {
    entries: RwLock<HashMap<String, Entry>>,
    ttl: chrono::Duration,
    max_entries: usize,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ListingCache {
    /// Create an empty cache holding at most [`DEFAULT_MAX_ENTRIES`] locations.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(365)),
            max_entries: DEFAULT_MAX_ENTRIES,
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cap the number of stored locations (at least one).
    #[must_use]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    /// Return the live entry for `location`, or compute, store and return a fresh one.
    ///
    /// # Errors
    ///
    /// Propagates the error of `compute`; nothing is stored in that case.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        location: &str,
        compute: F,
    ) -> Result<CachedListing, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<ShowSummary>, E>>,
    {
        if let Some(shows) = self.get(location).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            metrics::record_cache_lookup(CacheStatus::Hit);
            tracing::info!(key = location, hit = true, "[CACHE] GET");
            return Ok(CachedListing {
                status: CacheStatus::Hit,
                shows,
            });
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        metrics::record_cache_lookup(CacheStatus::Miss);
        tracing::info!(key = location, hit = false, "[CACHE] GET");

        let shows = compute().await?;
        self.set(location, shows.clone()).await;

        Ok(CachedListing {
            status: CacheStatus::Miss,
            shows,
        })
    }

    /// The live entry for `location`, if any. Does not touch the counters.
    pub async fn get(&self, location: &str) -> Option<Vec<ShowSummary>> {
        let now = self.clock.now();
        self.entries
            .read()
            .await
            .get(location)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| entry.shows.clone())
    }

    /// Store `shows` under `location` with the configured TTL.
    ///
    /// Expired entries are pruned first; at the cap, the entry closest to
    /// expiry makes room.
    pub async fn set(&self, location: &str, shows: Vec<ShowSummary>) {
        let now = self.clock.now();
        let count = shows.len();
        let mut entries = self.entries.write().await;

        let before = entries.len();
        entries.retain(|_, entry| now < entry.expires_at);
        let pruned = before - entries.len();

        if !entries.contains_key(location) && entries.len() >= self.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.expires_at)
                .map(|(key, _)| key.clone());
            if let Some(key) = oldest {
                entries.remove(&key);
                tracing::debug!(evicted = %key, "[CACHE] EVICT");
            }
        }

        entries.insert(
            location.to_string(),
            Entry {
                shows,
                expires_at: now + self.ttl,
            },
        );
        drop(entries);
        tracing::info!(key = location, shows = count, pruned, "[CACHE] SET");
    }

    /// Drop every entry.
    pub async fn clear_all(&self) {
        let mut entries = self.entries.write().await;
        let dropped = entries.len();
        entries.clear();
        drop(entries);

        metrics::record_cache_cleared();
        tracing::info!(dropped, "[CACHE] CLEAR");
    }

    /// Current counters.
    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.read().await.len(),
        }
    }
}

impl std::fmt::Debug for ListingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingCache")
            .field("ttl", &self.ttl)
            .field("max_entries", &self.max_entries)
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use showtime_testing::{ManualClock, test_time};
    use std::convert::Infallible;

    fn cache_with_clock() -> (ListingCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(test_time()));
        (ListingCache::new(clock.clone(), DEFAULT_TTL), clock)
    }

    async fn empty() -> Result<Vec<ShowSummary>, Infallible> {
        Ok(Vec::new())
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let (cache, _clock) = cache_with_clock();

        let first = cache.get_or_compute("Chennai", empty).await.unwrap();
        let second = cache.get_or_compute("Chennai", empty).await.unwrap();

        assert_eq!(first.status, CacheStatus::Miss);
        assert_eq!(second.status, CacheStatus::Hit);
        let stats = cache.stats().await;
        assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.set("Mumbai", Vec::new()).await;

        clock.advance(chrono::Duration::seconds(299));
        assert!(cache.get("Mumbai").await.is_some());

        clock.advance(chrono::Duration::seconds(1));
        assert!(cache.get("Mumbai").await.is_none());
    }

    #[tokio::test]
    async fn test_failed_compute_stores_nothing() {
        let (cache, _clock) = cache_with_clock();

        let result = cache
            .get_or_compute("Delhi", || async { Err::<Vec<ShowSummary>, _>("db down") })
            .await;

        assert_eq!(result.unwrap_err(), "db down");
        assert_eq!(cache.stats().await.entries, 0);
    }

    #[tokio::test]
    async fn test_clear_all_empties() {
        let (cache, _clock) = cache_with_clock();
        cache.set("Chennai", Vec::new()).await;
        cache.set("Delhi", Vec::new()).await;

        cache.clear_all().await;

        assert_eq!(cache.stats().await.entries, 0);
        assert!(cache.get("Chennai").await.is_none());
    }

    #[tokio::test]
    async fn test_write_prunes_expired_entries() {
        let (cache, clock) = cache_with_clock();
        for n in 0..1_000 {
            cache
                .get_or_compute(&format!("nowhere-{n}"), empty)
                .await
                .unwrap();
        }
        assert_eq!(cache.stats().await.entries, 500);

        clock.advance(chrono::Duration::days(30));
        cache.get_or_compute("Chennai", empty).await.unwrap();

        assert_eq!(cache.stats().await.entries, 1);
        assert!(cache.get("Chennai").await.is_some());
    }

    #[tokio::test]
    async fn test_cap_evicts_entry_closest_to_expiry() {
        let (cache, clock) = cache_with_clock();
        let cache = cache.with_max_entries(2);
        cache.set("Chennai", Vec::new()).await;
        clock.advance(chrono::Duration::seconds(10));
        cache.set("Delhi", Vec::new()).await;
        clock.advance(chrono::Duration::seconds(10));

        cache.set("Mumbai", Vec::new()).await;

        assert_eq!(cache.stats().await.entries, 2);
        assert!(cache.get("Chennai").await.is_none());
        assert!(cache.get("Delhi").await.is_some());
        assert!(cache.get("Mumbai").await.is_some());
    }

    #[tokio::test]
    async fn test_rewriting_key_at_cap_keeps_others() {
        let (cache, _clock) = cache_with_clock();
        let cache = cache.with_max_entries(2);
        cache.set("Chennai", Vec::new()).await;
        cache.set("Delhi", Vec::new()).await;

        cache.set("Delhi", Vec::new()).await;

        assert!(cache.get("Chennai").await.is_some());
        assert_eq!(cache.stats().await.entries, 2);
    }

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&CacheStatus::Hit).unwrap(), "\"HIT\"");
        assert_eq!(CacheStatus::Miss.as_str(), "MISS");
    }
}
