// Time-bounded in-memory result cache using DashMap
use crate::domain::error::ParcelError;
use crate::domain::model::{CacheKey, FeatureCollection};
use crate::domain::traits::Clock;
use crate::infrastructure::clock::SystemClock;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// `get_or_fetch` sweeps stale entries after this many inserts.
pub const SWEEP_EVERY: usize = 64;

#[derive(Debug, Clone)]
struct CacheEntry {
    collection: Arc<FeatureCollection>,
    inserted_at: DateTime<Utc>,
}

/// Thread-safe memo of successful fetches.
///
/// Expiry is lazy: a stale entry is treated as absent by [`ResultCache::get`]
/// and replaced on the next successful fetch. Every [`SWEEP_EVERY`] inserts,
/// `get_or_fetch` also runs [`ResultCache::purge_expired`], so a host that
/// keeps panning does not grow the map without bound. Plain `insert` never
/// sweeps; callers using it directly own the cleanup.
///
/// Writes are atomic per key. Two callers that miss on the same key at the
/// same time will both run their fetch and the later insert wins.
pub struct ResultCache {
    map: DashMap<CacheKey, CacheEntry>,
    clock: Arc<dyn Clock>,
    inserts: AtomicUsize,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            map: DashMap::new(),
            clock,
            inserts: AtomicUsize::new(0),
        }
    }

    /// Live entry for `key`, if one is younger than `ttl`.
    pub fn get(&self, key: &CacheKey, ttl: Duration) -> Option<Arc<FeatureCollection>> {
        let entry = self.map.get(key)?;
        if self.is_fresh(entry.inserted_at, ttl) {
            Some(entry.collection.clone())
        } else {
            None
        }
    }

    pub fn insert(&self, key: CacheKey, collection: Arc<FeatureCollection>) {
        let entry = CacheEntry {
            collection,
            inserted_at: self.clock.now(),
        };
        self.map.insert(key, entry);
    }

    /// Returns the cached collection for `key`, or runs `fetch` and memoizes
    /// its result. Errors from `fetch` are returned as-is and never cached.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: CacheKey,
        ttl: Duration,
        fetch: F,
    ) -> Result<Arc<FeatureCollection>, ParcelError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<FeatureCollection, ParcelError>>,
    {
        if let Some(hit) = self.get(&key, ttl) {
            debug!(features = hit.len(), "result cache hit");
            return Ok(hit);
        }
        debug!("result cache miss");

        let collection = Arc::new(fetch().await?);
        self.insert(key, collection.clone());

        if (self.inserts.fetch_add(1, Ordering::Relaxed) + 1) % SWEEP_EVERY == 0 {
            let removed = self.purge_expired(ttl);
            debug!(removed, "swept expired cache entries");
        }
        Ok(collection)
    }

    /// Drops every entry older than `ttl`. Returns how many were removed.
    pub fn purge_expired(&self, ttl: Duration) -> usize {
        let before = self.map.len();
        self.map
            .retain(|_, entry| self.is_fresh(entry.inserted_at, ttl));
        before.saturating_sub(self.map.len())
    }

    pub fn clear(&self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn is_fresh(&self, inserted_at: DateTime<Utc>, ttl: Duration) -> bool {
        let age = self.clock.now() - inserted_at;
        match age.to_std() {
            Ok(age) => age < ttl,
            // clock went backwards; treat as just inserted
            Err(_) => true,
        }
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}
