//! # f1-telemetry
//!
//! Data access and derivation core for an OpenF1 telemetry client.
//!
//! ## Features
//!
//! - In-process TTL cache with typed keys and lazy expiry
//! - Async gateway to the OpenF1 REST API with retry of transient failures
//! - Cache-aside loading with fixed per-domain TTLs
//! - Lap statistics and chart series
//! - Session filtering and grouping by meeting
//! - View consumers with busy/error state and scoped refresh
//!
//! ## Loading data
//!
//! One cache and one orchestrator are built at startup and shared by every
//! view. A second load of the same selector is served from the cache.
//!
//! ```no_run
//! use f1_telemetry::{ClientConfig, DataOrchestrator, HttpGateway, SessionListView, TtlCache};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::from_env()?;
//!     let gateway = Arc::new(HttpGateway::new(config.clone())?);
//!     let orchestrator = Arc::new(DataOrchestrator::new(Arc::new(TtlCache::new()), gateway));
//!
//!     let view = SessionListView::new(orchestrator, config.default_year);
//!     view.load().await;
//!     view.set_filter("race");
//!
//!     for group in view.groups() {
//!         println!("{} ({})", group.header(), group.session_count_label());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Failures
//!
//! Gateway errors never propagate out of a load. They are logged, kept off
//! the cache, and surface as the view's error message; `refresh` retries.

pub mod analysis;
pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod grouping;
pub mod model;
pub mod orchestrator;
pub mod view;

// Re-export main types for convenience
pub use analysis::{ChartColor, ChartEntry, LapStatistics, SectorAverages};
pub use cache::{CacheEntry, CacheKey, CacheStats, TtlCache};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Result, TelemetryError};
pub use gateway::{DataGateway, HttpGateway};
pub use grouping::{SessionFilter, SessionGroup};
pub use model::{CarDataSample, Driver, Lap, Meeting, Position, Session, SessionKind, Weather};
pub use orchestrator::{DataDomain, DataOrchestrator, LoadOutcome, Records};
pub use view::{DriverListView, SessionDetailView, SessionListView, TelemetryView, ViewStatus};
