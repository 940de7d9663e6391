//! Core type definitions for the cache system

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Typed cache key
///
/// The raw string is what the store indexes by; `T` is the type of value the
/// key was written with, so a `get` through the same key can only ask for
/// that type.
pub struct CacheKey<T> {
    raw: String,
    _value: PhantomData<fn() -> T>,
}

impl<T> CacheKey<T> {
    /// Wrap a raw key string
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            _value: PhantomData,
        }
    }

    /// The raw key string
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl<T> Clone for CacheKey<T> {
    fn clone(&self) -> Self {
        Self::new(self.raw.clone())
    }
}

impl<T> PartialEq for CacheKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for CacheKey<T> {}

impl<T> fmt::Debug for CacheKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CacheKey").field(&self.raw).finish()
    }
}

impl<T> fmt::Display for CacheKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Statistics for cache monitoring
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Total number of cache hits
    pub hits: u64,

    /// Total number of cache misses (including expired reads)
    pub misses: u64,

    /// Number of entries currently in cache
    pub entries: usize,

    /// Number of entries dropped because they were found expired on access
    pub evictions_ttl: u64,

    /// Number of explicit removals (remove and clear)
    pub invalidations: u64,
}

impl CacheStats {
    /// Calculate cache hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }

    /// Calculate miss rate as a percentage
    pub fn miss_rate(&self) -> f64 {
        100.0 - self.hit_rate()
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CacheStats {{ hits: {}, misses: {}, hit_rate: {:.2}%, entries: {}, expired: {}, invalidated: {} }}",
            self.hits,
            self.misses,
            self.hit_rate(),
            self.entries,
            self.evictions_ttl,
            self.invalidations
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_stats_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            ..Default::default()
        };

        assert_eq!(stats.hit_rate(), 80.0);
        assert_eq!(stats.miss_rate(), 20.0);
    }

    #[test]
    fn test_cache_stats_zero_requests() {
        let stats = CacheStats::default();
        assert_eq!(stats.hit_rate(), 0.0);
        assert_eq!(stats.miss_rate(), 100.0);
    }

    #[test]
    fn test_cache_stats_display() {
        let stats = CacheStats {
            hits: 100,
            misses: 50,
            entries: 75,
            evictions_ttl: 5,
            invalidations: 3,
        };

        let display = format!("{}", stats);
        assert!(display.contains("hits: 100"));
        assert!(display.contains("misses: 50"));
        assert!(display.contains("expired: 5"));
    }

    #[test]
    fn test_cache_key_identity() {
        let a: CacheKey<Vec<u32>> = CacheKey::new("laps_9158_1");
        let b: CacheKey<Vec<u32>> = CacheKey::new(String::from("laps_9158_1"));
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "laps_9158_1");
        assert_eq!(a.to_string(), "laps_9158_1");
        assert_eq!(format!("{:?}", a.clone()), "CacheKey(\"laps_9158_1\")");
    }
}
