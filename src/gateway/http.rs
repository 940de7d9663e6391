//! reqwest-backed gateway for the OpenF1 API

use crate::config::ClientConfig;
use crate::error::{Result, TelemetryError};
use crate::gateway::DataGateway;
use crate::model::{CarDataSample, Driver, Lap, Meeting, Position, Session, Weather};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, info, warn};

/// HTTP implementation of [`DataGateway`]
///
/// Transient failures (transport errors, timeouts, 429 and 5xx) are retried up
/// to `max_retries` times with a fixed delay. Client errors and undecodable
/// payloads fail immediately.
pub struct HttpGateway {
    client: Client,
    config: ClientConfig,
}

impl HttpGateway {
    /// Build a gateway with its own connection pool
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TelemetryError::Config(e.to_string()))?;

        info!("OpenF1 gateway targeting {}", config.base_url);

        Ok(Self { client, config })
    }

    /// Get the gateway configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GET `{base_url}{endpoint}` with query parameters and decode a JSON array
    async fn get_list<T>(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.base_url, endpoint);
        let mut attempt = 0;

        loop {
            let start = Instant::now();
            match self.try_get_list(&url, query).await {
                Ok(records) => {
                    debug!(
                        "GET {} {:?} -> {} records ({}ms)",
                        endpoint,
                        query,
                        records.len(),
                        start.elapsed().as_millis()
                    );
                    return Ok(records);
                }
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(
                        "GET {} failed (attempt {}/{}), retrying after {:?}: {}",
                        endpoint,
                        attempt,
                        self.config.max_retries + 1,
                        self.config.retry_delay,
                        e
                    );
                    tokio::time::sleep(self.config.retry_delay).await;
                }
                Err(e) => {
                    warn!("GET {} failed: {}", endpoint, e);
                    return Err(e);
                }
            }
        }
    }

    async fn try_get_list<T>(&self, url: &str, query: &[(&str, String)]) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let timeout_secs = self.config.timeout.as_secs();

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| TelemetryError::from_reqwest(e, timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TelemetryError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TelemetryError::from_reqwest(e, timeout_secs))?;

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl DataGateway for HttpGateway {
    async fn fetch_sessions(&self, year: i32) -> Result<Vec<Session>> {
        self.get_list("sessions", &[("year", year.to_string())]).await
    }

    async fn fetch_session_by_key(&self, session_key: u32) -> Result<Option<Session>> {
        let sessions: Vec<Session> = self
            .get_list("sessions", &[("session_key", session_key.to_string())])
            .await?;
        Ok(sessions.into_iter().next())
    }

    async fn fetch_drivers(&self, session_key: u32) -> Result<Vec<Driver>> {
        self.get_list("drivers", &[("session_key", session_key.to_string())])
            .await
    }

    async fn fetch_laps(&self, session_key: u32, driver_number: u32) -> Result<Vec<Lap>> {
        self.get_list(
            "laps",
            &[
                ("session_key", session_key.to_string()),
                ("driver_number", driver_number.to_string()),
            ],
        )
        .await
    }

    async fn fetch_car_data(&self, session_key: u32, driver_number: u32) -> Result<Vec<CarDataSample>> {
        self.get_list(
            "car_data",
            &[
                ("session_key", session_key.to_string()),
                ("driver_number", driver_number.to_string()),
            ],
        )
        .await
    }

    async fn fetch_weather(&self, session_key: u32) -> Result<Vec<Weather>> {
        self.get_list("weather", &[("session_key", session_key.to_string())])
            .await
    }

    async fn fetch_positions(&self, session_key: u32) -> Result<Vec<Position>> {
        self.get_list("position", &[("session_key", session_key.to_string())])
            .await
    }

    async fn fetch_meetings(&self, year: i32) -> Result<Vec<Meeting>> {
        self.get_list("meetings", &[("year", year.to_string())]).await
    }
}
