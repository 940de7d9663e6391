//! Remote data gateway
//!
//! The boundary between the core and the OpenF1 REST API. The orchestrator
//! only sees [`DataGateway`]; [`HttpGateway`] is the production implementation.
//! Every method may fail, and the orchestrator treats all failures the same.

pub mod http;

pub use http::HttpGateway;

use crate::error::Result;
use crate::model::{CarDataSample, Driver, Lap, Meeting, Position, Session, Weather};
use async_trait::async_trait;

/// Typed read access to the remote API
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// All sessions of a season
    async fn fetch_sessions(&self, year: i32) -> Result<Vec<Session>>;

    /// A single session, `None` if the key is unknown
    async fn fetch_session_by_key(&self, session_key: u32) -> Result<Option<Session>>;

    /// Drivers entered in a session
    async fn fetch_drivers(&self, session_key: u32) -> Result<Vec<Driver>>;

    /// Laps of one driver in one session
    async fn fetch_laps(&self, session_key: u32, driver_number: u32) -> Result<Vec<Lap>>;

    /// Car telemetry samples of one driver in one session
    async fn fetch_car_data(&self, session_key: u32, driver_number: u32) -> Result<Vec<CarDataSample>>;

    /// Weather readings for a session
    async fn fetch_weather(&self, session_key: u32) -> Result<Vec<Weather>>;

    /// Running positions for a session
    async fn fetch_positions(&self, session_key: u32) -> Result<Vec<Position>>;

    /// Race weekends of a season
    async fn fetch_meetings(&self, year: i32) -> Result<Vec<Meeting>>;
}
