//! Cache key construction and domain TTLs
//!
//! Every key is `{domain tag}_{param}_{param}...` with integer parameters, so
//! equal selectors give equal keys and different selectors never collide.
//! Each domain also fixes the value type stored under its keys.

use crate::cache::CacheKey;
use crate::model::{CarDataSample, Driver, Lap, Meeting, Position, Session, Weather};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Cached collection of records, shared between the cache and its readers
pub type Records<T> = Arc<Vec<T>>;

/// Live data: car telemetry, weather, positions
pub const LIVE_TTL: Duration = Duration::from_secs(60);

/// Session metadata, entry lists, laps
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Historical calendar data
pub const HISTORICAL_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Driver and team static info
pub const STATIC_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Category of remote resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataDomain {
    /// Sessions of a season
    Sessions,
    /// One session by key
    Session,
    /// Drivers of one session
    Drivers,
    /// Season roster taken from the latest race
    SeasonDrivers,
    Laps,
    CarData,
    Weather,
    Positions,
    Meetings,
}

impl DataDomain {
    /// Key prefix for this domain
    pub fn tag(&self) -> &'static str {
        match self {
            DataDomain::Sessions => "sessions",
            DataDomain::Session => "session",
            DataDomain::Drivers => "drivers",
            DataDomain::SeasonDrivers => "drivers_list",
            DataDomain::Laps => "laps",
            DataDomain::CarData => "cardata",
            DataDomain::Weather => "weather",
            DataDomain::Positions => "positions",
            DataDomain::Meetings => "meetings",
        }
    }

    /// Fixed time-to-live for entries of this domain
    pub fn ttl(&self) -> Duration {
        match self {
            DataDomain::CarData | DataDomain::Weather | DataDomain::Positions => LIVE_TTL,
            DataDomain::Sessions | DataDomain::Session | DataDomain::Drivers | DataDomain::Laps => {
                SESSION_TTL
            }
            DataDomain::Meetings => HISTORICAL_TTL,
            DataDomain::SeasonDrivers => STATIC_TTL,
        }
    }
}

impl fmt::Display for DataDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Cache key builder for a data domain
pub struct CacheKeyBuilder {
    domain: DataDomain,
    params: Vec<i64>,
}

impl CacheKeyBuilder {
    /// Create a new cache key builder
    pub fn new(domain: DataDomain) -> Self {
        Self {
            domain,
            params: Vec::new(),
        }
    }

    /// Append a selector parameter
    pub fn param(mut self, value: impl Into<i64>) -> Self {
        self.params.push(value.into());
        self
    }

    /// Build the raw key string
    pub fn build_raw(&self) -> String {
        let mut key = self.domain.tag().to_string();
        for p in &self.params {
            key.push('_');
            key.push_str(&p.to_string());
        }
        key
    }

    /// Build a typed key
    pub fn build<T>(self) -> CacheKey<T> {
        CacheKey::new(self.build_raw())
    }
}

pub fn sessions(year: i32) -> CacheKey<Records<Session>> {
    CacheKeyBuilder::new(DataDomain::Sessions).param(year).build()
}

pub fn session(session_key: u32) -> CacheKey<Arc<Session>> {
    CacheKeyBuilder::new(DataDomain::Session).param(session_key).build()
}

pub fn drivers(session_key: u32) -> CacheKey<Records<Driver>> {
    CacheKeyBuilder::new(DataDomain::Drivers).param(session_key).build()
}

pub fn season_drivers(year: i32) -> CacheKey<Records<Driver>> {
    CacheKeyBuilder::new(DataDomain::SeasonDrivers).param(year).build()
}

pub fn laps(session_key: u32, driver_number: u32) -> CacheKey<Records<Lap>> {
    CacheKeyBuilder::new(DataDomain::Laps)
        .param(session_key)
        .param(driver_number)
        .build()
}

pub fn car_data(session_key: u32, driver_number: u32) -> CacheKey<Records<CarDataSample>> {
    CacheKeyBuilder::new(DataDomain::CarData)
        .param(session_key)
        .param(driver_number)
        .build()
}

pub fn weather(session_key: u32) -> CacheKey<Records<Weather>> {
    CacheKeyBuilder::new(DataDomain::Weather).param(session_key).build()
}

pub fn positions(session_key: u32) -> CacheKey<Records<Position>> {
    CacheKeyBuilder::new(DataDomain::Positions).param(session_key).build()
}

pub fn meetings(year: i32) -> CacheKey<Records<Meeting>> {
    CacheKeyBuilder::new(DataDomain::Meetings).param(year).build()
}
