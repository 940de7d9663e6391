//! # TTL cache
//!
//! A process-wide, memory-resident key/value store with per-entry absolute
//! expiration.
//!
//! - **Typed keys**: [`CacheKey<T>`] ties a raw key string to the value type
//!   written under it, so a read through the same key is checked at compile time
//! - **Lazy expiry**: entries are checked against their deadline only on
//!   `get`/`exists`; there is no background sweep
//! - **Last writer wins**: `set` always replaces the prior entry and its expiry
//!
//! ## Example
//!
//! ```rust
//! use f1_telemetry::cache::{CacheKey, TtlCache};
//! use std::time::Duration;
//!
//! # fn example() -> f1_telemetry::Result<()> {
//! let cache = TtlCache::new();
//! let key: CacheKey<Vec<u32>> = CacheKey::new("laps_9158_1");
//!
//! cache.set(&key, vec![1, 2, 3], Duration::from_secs(3600));
//!
//! if let Some(laps) = cache.get(&key)? {
//!     println!("Cache hit: {:?}", laps);
//! }
//! # Ok(())
//! # }
//! ```

pub mod entry;
pub mod store;
pub mod types;

pub use entry::CacheEntry;
pub use store::TtlCache;
pub use types::{CacheKey, CacheStats};
