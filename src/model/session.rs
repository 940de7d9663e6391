//! Session records and session-type classification

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single on-track session (practice, qualifying, sprint or race)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_key: u32,
    #[serde(default)]
    pub session_name: String,
    /// Free-form type as reported by the API, e.g. "Practice", "Race"
    #[serde(default)]
    pub session_type: String,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
    pub meeting_key: u32,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub country_name: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub circuit_short_name: String,
    #[serde(default)]
    pub gmt_offset: String,
    pub year: i32,
}

impl Session {
    /// Classify the session type
    pub fn kind(&self) -> SessionKind {
        SessionKind::from_type(&self.session_type)
    }

    /// Lifecycle relative to `now`
    pub fn status(&self, now: DateTime<Utc>) -> SessionStatus {
        if now < self.date_start {
            SessionStatus::Upcoming
        } else if now <= self.date_end {
            SessionStatus::Live
        } else {
            SessionStatus::Completed
        }
    }

    /// e.g. "Mar 02, 2024"
    pub fn formatted_date(&self) -> String {
        self.date_start.format("%b %d, %Y").to_string()
    }

    /// e.g. "15:00"
    pub fn formatted_time(&self) -> String {
        self.date_start.format("%H:%M").to_string()
    }
}

/// Session category, in display precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SessionKind {
    Practice,
    Qualifying,
    Sprint,
    Race,
    Unknown,
}

impl SessionKind {
    /// Classify a free-form session type, case-insensitively
    ///
    /// "Sprint Qualifying" and "Sprint Shootout" count as qualifying.
    pub fn from_type(session_type: &str) -> Self {
        let t = session_type.to_lowercase();
        if t.contains("practice") {
            SessionKind::Practice
        } else if t.contains("qualifying") || t.contains("shootout") {
            SessionKind::Qualifying
        } else if t.contains("sprint") {
            SessionKind::Sprint
        } else if t.contains("race") {
            SessionKind::Race
        } else {
            SessionKind::Unknown
        }
    }

    /// Ordering rank within a meeting: Practice 1 through Unknown 5
    pub fn precedence(&self) -> u8 {
        match self {
            SessionKind::Practice => 1,
            SessionKind::Qualifying => 2,
            SessionKind::Sprint => 3,
            SessionKind::Race => 4,
            SessionKind::Unknown => 5,
        }
    }
}

/// Where a session is relative to the current time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Upcoming,
    Live,
    Completed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Upcoming => write!(f, "UPCOMING"),
            SessionStatus::Live => write!(f, "LIVE"),
            SessionStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}
