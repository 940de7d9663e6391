//! Cache-aside orchestration over the data gateway
//!
//! Every read goes through [`DataOrchestrator`]: look up the typed key, serve
//! a live entry, otherwise fetch through the gateway and store non-empty
//! results under the domain's TTL. Gateway failures never escape as errors;
//! they come back as [`LoadOutcome::Failed`] with a readable message and are
//! never cached, so the next load retries.

pub mod keys;

pub use keys::{CacheKeyBuilder, DataDomain, Records};

use crate::cache::{CacheKey, CacheStats, TtlCache};
use crate::error::{Result, TelemetryError};
use crate::gateway::DataGateway;
use crate::model::{CarDataSample, Driver, Lap, Meeting, Position, Session, SessionKind, Weather};
use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Result of a cache-aside load
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    /// Served from a live cache entry
    Cached(T),

    /// Fetched from the gateway and stored
    Fetched(T),

    /// The gateway returned nothing; nothing was stored
    Empty,

    /// The gateway failed; nothing was stored
    Failed(String),
}

impl<T> LoadOutcome<T> {
    /// The loaded value, if any
    pub fn data(&self) -> Option<&T> {
        match self {
            LoadOutcome::Cached(v) | LoadOutcome::Fetched(v) => Some(v),
            LoadOutcome::Empty | LoadOutcome::Failed(_) => None,
        }
    }

    /// Take the loaded value, if any
    pub fn into_value(self) -> Option<T> {
        match self {
            LoadOutcome::Cached(v) | LoadOutcome::Fetched(v) => Some(v),
            LoadOutcome::Empty | LoadOutcome::Failed(_) => None,
        }
    }

    /// Whether the value came from the cache
    pub fn is_cached(&self) -> bool {
        matches!(self, LoadOutcome::Cached(_))
    }

    /// Failure message, if the gateway failed
    pub fn error_message(&self) -> Option<&str> {
        match self {
            LoadOutcome::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// Transform the loaded value, keeping the outcome kind
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> LoadOutcome<U> {
        match self {
            LoadOutcome::Cached(v) => LoadOutcome::Cached(f(v)),
            LoadOutcome::Fetched(v) => LoadOutcome::Fetched(f(v)),
            LoadOutcome::Empty => LoadOutcome::Empty,
            LoadOutcome::Failed(msg) => LoadOutcome::Failed(msg),
        }
    }
}

impl<T> LoadOutcome<Records<T>> {
    /// Loaded records, empty on `Empty` or `Failed`
    pub fn records(&self) -> &[T] {
        self.data().map(|r| r.as_slice()).unwrap_or(&[])
    }
}

/// Cache-aside front for every remote read
///
/// Holds the shared cache and the gateway. Consumers share one orchestrator
/// through an `Arc`, so a value fetched for one consumer is served from the
/// cache to every other.
pub struct DataOrchestrator {
    cache: Arc<TtlCache>,
    gateway: Arc<dyn DataGateway>,
}

impl DataOrchestrator {
    /// Create an orchestrator over an existing cache and gateway
    pub fn new(cache: Arc<TtlCache>, gateway: Arc<dyn DataGateway>) -> Self {
        Self { cache, gateway }
    }

    /// Create an orchestrator with a fresh cache
    pub fn with_gateway(gateway: Arc<dyn DataGateway>) -> Self {
        Self::new(Arc::new(TtlCache::new()), gateway)
    }

    /// Get the underlying cache instance
    pub fn cache(&self) -> Arc<TtlCache> {
        self.cache.clone()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop one entry so the next load goes to the gateway
    pub fn invalidate<T>(&self, key: &CacheKey<T>) -> bool {
        let removed = self.cache.remove(key);
        if removed {
            debug!("Invalidated {}", key);
        }
        removed
    }

    /// Sessions of a season
    pub async fn sessions(&self, year: i32) -> LoadOutcome<Records<Session>> {
        self.load_records(keys::sessions(year), DataDomain::Sessions, || {
            self.gateway.fetch_sessions(year)
        })
        .await
    }

    /// One session by key
    pub async fn session(&self, session_key: u32) -> LoadOutcome<Arc<Session>> {
        let gateway = self.gateway.clone();
        self.load_cached(
            keys::session(session_key),
            DataDomain::Session.ttl(),
            async move {
                let session = gateway.fetch_session_by_key(session_key).await?;
                Ok::<_, TelemetryError>(session.map(Arc::new))
            },
        )
        .await
    }

    /// Drivers entered in a session
    pub async fn drivers(&self, session_key: u32) -> LoadOutcome<Records<Driver>> {
        self.load_records(keys::drivers(session_key), DataDomain::Drivers, || {
            self.gateway.fetch_drivers(session_key)
        })
        .await
    }

    /// Season roster: the entry list of the most recent race of `year`
    ///
    /// Fetched straight from the gateway and cached as its own domain, so a
    /// refresh of the roster always reaches the API. A season without a race
    /// yet is `Empty`.
    pub async fn season_drivers(&self, year: i32) -> LoadOutcome<Records<Driver>> {
        let gateway = self.gateway.clone();
        let fetch = async move {
            let sessions = gateway.fetch_sessions(year).await?;

            let Some(race) = latest_race(&sessions) else {
                info!("No race session found for {}", year);
                return Ok::<_, TelemetryError>(None);
            };

            debug!(
                "Season {} roster taken from session {} ({})",
                year, race.session_key, race.location
            );

            let drivers = gateway.fetch_drivers(race.session_key).await?;
            Ok((!drivers.is_empty()).then(|| Arc::new(drivers)))
        };

        self.load_cached(keys::season_drivers(year), DataDomain::SeasonDrivers.ttl(), fetch)
            .await
    }

    /// Laps of one driver in one session
    pub async fn laps(&self, session_key: u32, driver_number: u32) -> LoadOutcome<Records<Lap>> {
        self.load_records(keys::laps(session_key, driver_number), DataDomain::Laps, || {
            self.gateway.fetch_laps(session_key, driver_number)
        })
        .await
    }

    /// Car telemetry of one driver in one session
    pub async fn car_data(
        &self,
        session_key: u32,
        driver_number: u32,
    ) -> LoadOutcome<Records<CarDataSample>> {
        self.load_records(
            keys::car_data(session_key, driver_number),
            DataDomain::CarData,
            || self.gateway.fetch_car_data(session_key, driver_number),
        )
        .await
    }

    /// Weather readings for a session
    pub async fn weather(&self, session_key: u32) -> LoadOutcome<Records<Weather>> {
        self.load_records(keys::weather(session_key), DataDomain::Weather, || {
            self.gateway.fetch_weather(session_key)
        })
        .await
    }

    /// Running positions for a session
    pub async fn positions(&self, session_key: u32) -> LoadOutcome<Records<Position>> {
        self.load_records(keys::positions(session_key), DataDomain::Positions, || {
            self.gateway.fetch_positions(session_key)
        })
        .await
    }

    /// Race weekends of a season
    pub async fn meetings(&self, year: i32) -> LoadOutcome<Records<Meeting>> {
        self.load_records(keys::meetings(year), DataDomain::Meetings, || {
            self.gateway.fetch_meetings(year)
        })
        .await
    }

    async fn load_records<T, F, Fut>(
        &self,
        key: CacheKey<Records<T>>,
        domain: DataDomain,
        fetch: F,
    ) -> LoadOutcome<Records<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        let fetch = async move {
            let records = fetch().await?;
            Ok::<_, TelemetryError>((!records.is_empty()).then(|| Arc::new(records)))
        };
        self.load_cached(key, domain.ttl(), fetch).await
    }

    /// Core cache-aside step
    ///
    /// `fetch` resolves to `Ok(None)` when the gateway had nothing to return.
    async fn load_cached<V, Fut>(&self, key: CacheKey<V>, ttl: Duration, fetch: Fut) -> LoadOutcome<V>
    where
        V: Any + Clone + Send + Sync,
        Fut: Future<Output = Result<Option<V>>>,
    {
        match self.cache.get(&key) {
            Ok(Some(value)) => return LoadOutcome::Cached(value),
            Ok(None) => {}
            // Treated as a miss; the fresh value overwrites the bad entry
            Err(e) => error!("Ignoring unreadable cache entry {}: {}", key, e),
        }

        debug!("Fetching {} from gateway", key);
        match fetch.await {
            Ok(Some(value)) => {
                self.cache.set(&key, value.clone(), ttl);
                info!("Cached {} for {:?}", key, ttl);
                LoadOutcome::Fetched(value)
            }
            Ok(None) => {
                debug!("Gateway returned no data for {}", key);
                LoadOutcome::Empty
            }
            Err(e) => {
                warn!("Failed to load {}: {}", key, e);
                LoadOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Latest-starting session classified as a race
fn latest_race(sessions: &[Session]) -> Option<&Session> {
    sessions
        .iter()
        .filter(|s| s.kind() == SessionKind::Race)
        .max_by_key(|s| s.date_start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn session(key: u32, kind: &str, day: u32) -> Session {
        Session {
            session_key: key,
            session_name: kind.to_string(),
            session_type: kind.to_string(),
            date_start: Utc.with_ymd_and_hms(2024, 3, day, 15, 0, 0).unwrap(),
            date_end: Utc.with_ymd_and_hms(2024, 3, day, 17, 0, 0).unwrap(),
            meeting_key: 1,
            location: "Sakhir".to_string(),
            country_name: "Bahrain".to_string(),
            country_code: "BRN".to_string(),
            circuit_short_name: "Sakhir".to_string(),
            gmt_offset: "03:00:00".to_string(),
            year: 2024,
        }
    }

    #[test]
    fn test_load_outcome_accessors() {
        let fetched: LoadOutcome<Records<u32>> = LoadOutcome::Fetched(Arc::new(vec![1, 2]));
        assert_eq!(fetched.records(), &[1, 2]);
        assert!(!fetched.is_cached());
        assert!(fetched.error_message().is_none());

        let failed: LoadOutcome<Records<u32>> = LoadOutcome::Failed("boom".to_string());
        assert!(failed.records().is_empty());
        assert_eq!(failed.error_message(), Some("boom"));

        let empty: LoadOutcome<Records<u32>> = LoadOutcome::Empty;
        assert!(empty.data().is_none());
        assert!(empty.error_message().is_none());
    }

    #[test]
    fn test_load_outcome_map_keeps_kind() {
        let cached = LoadOutcome::Cached(2).map(|v| v * 10);
        assert_eq!(cached, LoadOutcome::Cached(20));

        let failed: LoadOutcome<u32> = LoadOutcome::Failed("x".to_string());
        assert_eq!(failed.map(|v| v + 1), LoadOutcome::Failed("x".to_string()));
    }

    #[test]
    fn test_latest_race_ignores_other_kinds() {
        let sessions = vec![
            session(1, "Race", 2),
            session(2, "Practice", 20),
            session(3, "Race", 9),
            session(4, "Qualifying", 8),
        ];
        assert_eq!(latest_race(&sessions).map(|s| s.session_key), Some(3));
        assert!(latest_race(&sessions[1..2]).is_none());
    }
}
