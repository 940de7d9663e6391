//! Error types for telemetry data access
//!
//! Gateway failures are classified here so the orchestrator can turn every
//! one of them into a soft "no data" outcome while still keeping a readable
//! message for the consumer.

use thiserror::Error;

/// Main error type for fetching and caching telemetry data
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Transport error - DNS, connection refused, reset, TLS
    #[error("HTTP error: {0}")]
    Http(String),

    /// Request timeout
    #[error("Request timed out after {timeout_seconds}s: {context}")]
    Timeout {
        timeout_seconds: u64,
        context: String,
    },

    /// Non-success HTTP status returned by the API
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// Payload could not be decoded into the expected records
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A cache key was read back as a different type than it was written with
    #[error("Cache type mismatch for key '{key}'")]
    CacheTypeMismatch { key: String },

    /// Generic error with context
    #[error("Error: {0}")]
    Other(String),
}

impl TelemetryError {
    /// Whether a retry of the same request could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            TelemetryError::Http(_) | TelemetryError::Timeout { .. } => true,
            TelemetryError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Classify a reqwest failure
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_seconds: u64) -> Self {
        if err.is_timeout() {
            TelemetryError::Timeout {
                timeout_seconds,
                context: err
                    .url()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| "request".to_string()),
            }
        } else if err.is_decode() {
            TelemetryError::Deserialization(err.to_string())
        } else if let Some(status) = err.status() {
            TelemetryError::Status {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            TelemetryError::Http(err.to_string())
        }
    }
}

/// Result type alias for telemetry operations
pub type Result<T> = std::result::Result<T, TelemetryError>;

impl From<serde_json::Error> for TelemetryError {
    fn from(err: serde_json::Error) -> Self {
        TelemetryError::Deserialization(err.to_string())
    }
}

impl From<String> for TelemetryError {
    fn from(s: String) -> Self {
        TelemetryError::Other(s)
    }
}

impl From<&str> for TelemetryError {
    fn from(s: &str) -> Self {
        TelemetryError::Other(s.to_string())
    }
}
