//! Grand Prix weekends (meetings)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A race weekend grouping several sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub meeting_key: u32,
    #[serde(default)]
    pub meeting_name: String,
    #[serde(default)]
    pub meeting_official_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub country_name: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub circuit_short_name: String,
    #[serde(default)]
    pub circuit_key: u32,
    pub date_start: DateTime<Utc>,
    #[serde(default)]
    pub gmt_offset: String,
    pub year: i32,
}

impl Meeting {
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.date_start > now
    }

    /// e.g. "March 02, 2024"
    pub fn formatted_date(&self) -> String {
        self.date_start.format("%B %d, %Y").to_string()
    }
}
