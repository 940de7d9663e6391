//! Cache entry with absolute expiration

use chrono::{DateTime, Utc};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

/// Shared, type-erased cached value
pub(crate) type ErasedValue = Arc<dyn Any + Send + Sync>;

/// A cache entry: the stored value and the instant it stops being served
#[derive(Clone)]
pub struct CacheEntry {
    /// The cached value, downcast at the call site
    pub(crate) value: ErasedValue,

    /// When the entry was written
    pub created_at: DateTime<Utc>,

    /// When the entry expires
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Create an entry expiring `ttl` from now
    pub fn new<T: Any + Send + Sync>(value: T, ttl: Duration) -> Self {
        let now = Utc::now();
        // Durations beyond chrono's range are clamped to a century
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::weeks(52 * 100));
        let expires_at = now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            value: Arc::new(value),
            created_at: now,
            expires_at,
        }
    }

    /// Create an entry with an explicit expiration instant
    pub fn with_expiration<T: Any + Send + Sync>(value: T, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: Arc::new(value),
            created_at: Utc::now(),
            expires_at,
        }
    }

    /// An entry is live while `now < expires_at`
    pub(crate) fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Time since the entry was written, as of `now`
    pub(crate) fn age_at(&self, now: DateTime<Utc>) -> Duration {
        (now - self.created_at)
            .to_std()
            .unwrap_or(Duration::from_secs(0))
    }

    /// Clone the value out if it was stored as `T`
    pub(crate) fn downcast<T: Any + Clone>(&self) -> Option<T> {
        self.value.downcast_ref::<T>().cloned()
    }
}

impl std::fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheEntry")
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}
