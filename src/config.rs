//! Client configuration
//!
//! Defaults point at the public OpenF1 endpoint. `from_env` layers values
//! from the process environment (and a `.env` file, if present) on top.

use crate::error::{Result, TelemetryError};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public OpenF1 API root
pub const DEFAULT_BASE_URL: &str = "https://api.openf1.org/v1/";

/// First season with complete OpenF1 coverage
pub const FIRST_SUPPORTED_YEAR: i32 = 2018;

/// Configuration for the data gateway and consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root, always ending in `/`
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Extra attempts for transient failures (0 disables retries)
    pub max_retries: u32,

    /// Delay between attempts
    pub retry_delay: Duration,

    /// Season shown when no year is chosen
    pub default_year: i32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
            default_year: chrono::Utc::now().year(),
        }
    }
}

impl ClientConfig {
    /// Create a new builder for client configuration
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load configuration from `OPENF1_*` environment variables
    ///
    /// Reads `.env` first if one exists. Unset variables keep their defaults;
    /// set-but-malformed ones are an error.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(url) = lookup("OPENF1_BASE_URL") {
            builder = builder.base_url(url);
        }
        if let Some(secs) = lookup("OPENF1_TIMEOUT_SECS") {
            builder = builder.timeout(Duration::from_secs(parse_var("OPENF1_TIMEOUT_SECS", &secs)?));
        }
        if let Some(retries) = lookup("OPENF1_MAX_RETRIES") {
            builder = builder.max_retries(parse_var("OPENF1_MAX_RETRIES", &retries)?);
        }
        if let Some(ms) = lookup("OPENF1_RETRY_DELAY_MS") {
            builder = builder.retry_delay(Duration::from_millis(parse_var("OPENF1_RETRY_DELAY_MS", &ms)?));
        }
        if let Some(year) = lookup("OPENF1_DEFAULT_YEAR") {
            builder = builder.default_year(parse_var("OPENF1_DEFAULT_YEAR", &year)?);
        }

        let config = builder.build();
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(TelemetryError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }

        if self.timeout.is_zero() {
            return Err(TelemetryError::Config(
                "timeout must be greater than 0".to_string(),
            ));
        }

        if self.default_year < FIRST_SUPPORTED_YEAR {
            return Err(TelemetryError::Config(format!(
                "default_year must be {} or later",
                FIRST_SUPPORTED_YEAR
            )));
        }

        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| TelemetryError::Config(format!("{} has an invalid value: '{}'", name, value)))
}

/// Builder for client configuration
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
    retry_delay: Option<Duration>,
    default_year: Option<i32>,
}

impl ClientConfigBuilder {
    /// Set the API root; a trailing `/` is added if missing
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the retry budget for transient failures
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set the delay between attempts
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    /// Set the default season
    pub fn default_year(mut self, year: i32) -> Self {
        self.default_year = Some(year);
        self
    }

    /// Build the client configuration
    pub fn build(self) -> ClientConfig {
        let defaults = ClientConfig::default();

        let mut base_url = self.base_url.unwrap_or(defaults.base_url);
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        ClientConfig {
            base_url,
            timeout: self.timeout.unwrap_or(defaults.timeout),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_delay: self.retry_delay.unwrap_or(defaults.retry_delay),
            default_year: self.default_year.unwrap_or(defaults.default_year),
        }
    }
}
