//! In-memory TTL cache store
//!
//! Expiry is lazy: an entry past its deadline is dropped the next time it is
//! read through `get` or `exists`. Nothing sweeps the map in the background, so
//! an expired entry that is never read again stays resident until `remove` or
//! `clear`.

use crate::cache::{
    entry::CacheEntry,
    types::{CacheKey, CacheStats},
};
use crate::error::{Result, TelemetryError};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, info};

/// Process-wide TTL cache shared by every consumer
///
/// Construct one at startup and hand out `Arc<TtlCache>` clones. All
/// operations are synchronous and hold the lock only for the map access
/// itself, so they are safe to call from async code.
pub struct TtlCache {
    store: RwLock<CacheStore>,
}

/// Internal cache storage
struct CacheStore {
    /// Main storage: key -> entry
    entries: HashMap<String, CacheEntry>,

    /// Current cache statistics
    stats: CacheStats,
}

impl CacheStore {
    fn remove_entry(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.stats.entries = self.entries.len();
        removed
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TtlCache {
    /// Create an empty cache
    pub fn new() -> Self {
        info!("Initializing TTL cache");

        Self {
            store: RwLock::new(CacheStore {
                entries: HashMap::new(),
                stats: CacheStats::default(),
            }),
        }
    }

    /// Store `value` under `key`, replacing any prior entry and its expiry
    pub fn set<T>(&self, key: &CacheKey<T>, value: T, ttl: Duration)
    where
        T: Any + Send + Sync,
    {
        self.insert_entry(key.as_str(), CacheEntry::new(value, ttl));
    }

    /// Store `value` under `key` with an absolute expiration instant
    pub fn set_with_expiration<T>(&self, key: &CacheKey<T>, value: T, expires_at: DateTime<Utc>)
    where
        T: Any + Send + Sync,
    {
        self.insert_entry(key.as_str(), CacheEntry::with_expiration(value, expires_at));
    }

    fn insert_entry(&self, key: &str, entry: CacheEntry) {
        let mut store = self.store.write();
        debug!("Caching entry: {} (expires {})", key, entry.expires_at);
        store.entries.insert(key.to_string(), entry);
        store.stats.entries = store.entries.len();
    }

    /// Get a live value
    ///
    /// Returns `Ok(None)` on a miss or when the entry has expired, in which
    /// case the entry is evicted. Returns `CacheTypeMismatch` if the key holds
    /// a value of another type.
    pub fn get<T>(&self, key: &CacheKey<T>) -> Result<Option<T>>
    where
        T: Any + Clone + Send + Sync,
    {
        let raw = key.as_str();
        let now = Utc::now();

        {
            let mut store = self.store.write();

            let Some(entry) = store.entries.get(raw) else {
                debug!("Cache miss: {}", raw);
                store.stats.misses += 1;
                return Ok(None);
            };

            if entry.is_expired_at(now) {
                debug!("Cache entry expired: {}", raw);
                store.stats.misses += 1;
                store.stats.evictions_ttl += 1;
                store.remove_entry(raw);
                return Ok(None);
            }

            if let Some(value) = entry.downcast::<T>() {
                debug!("Cache hit: {} (age {:?})", raw, entry.age_at(now));
                store.stats.hits += 1;
                return Ok(Some(value));
            }

            store.stats.misses += 1;
        }

        error!(
            "Cache entry {} holds a different type than {}",
            raw,
            std::any::type_name::<T>()
        );
        Err(TelemetryError::CacheTypeMismatch {
            key: raw.to_string(),
        })
    }

    /// Whether a live entry exists for `key`; evicts it if expired
    pub fn exists<T>(&self, key: &CacheKey<T>) -> bool {
        self.exists_raw(key.as_str())
    }

    /// Untyped variant of [`TtlCache::exists`]
    pub fn exists_raw(&self, key: &str) -> bool {
        let now = Utc::now();
        {
            let store = self.store.read();
            match store.entries.get(key) {
                None => return false,
                Some(entry) if !entry.is_expired_at(now) => return true,
                Some(_) => {}
            }
        }

        let mut store = self.store.write();
        // Re-check under the write lock; a concurrent `set` may have refreshed it
        match store.entries.get(key) {
            Some(entry) if entry.is_expired_at(now) => {
                debug!("Cache entry expired: {}", key);
                store.stats.evictions_ttl += 1;
                store.remove_entry(key);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Remove a specific entry; returns whether anything was removed
    pub fn remove<T>(&self, key: &CacheKey<T>) -> bool {
        self.remove_raw(key.as_str())
    }

    /// Untyped variant of [`TtlCache::remove`]
    pub fn remove_raw(&self, key: &str) -> bool {
        let mut store = self.store.write();
        let removed = store.remove_entry(key);
        if removed {
            store.stats.invalidations += 1;
            debug!("Removed cache entry: {}", key);
        }
        removed
    }

    /// Clear all entries from the cache
    pub fn clear(&self) {
        let mut store = self.store.write();

        let count = store.entries.len();
        store.entries.clear();
        store.stats.entries = 0;
        store.stats.invalidations += count as u64;

        info!("Cleared {} entries from cache", count);
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.store.read().stats.clone()
    }

    /// Number of stored entries, expired-but-unread ones included
    pub fn len(&self) -> usize {
        self.store.read().entries.len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.store.read().entries.is_empty()
    }
}
