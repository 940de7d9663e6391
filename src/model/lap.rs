//! Lap records and lap-time formatting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder shown when a lap has no recorded duration
pub const NO_LAP_TIME: &str = "--:--.---";

/// Placeholder shown when a sector has no recorded duration
pub const NO_SECTOR_TIME: &str = "--.-";

/// One timed lap of one driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    pub session_key: u32,
    pub driver_number: u32,
    pub lap_number: u32,
    /// Seconds; absent for out-laps and laps interrupted by red flags
    #[serde(default)]
    pub lap_duration: Option<f64>,
    #[serde(default, rename = "duration_sector_1")]
    pub sector_1: Option<f64>,
    #[serde(default, rename = "duration_sector_2")]
    pub sector_2: Option<f64>,
    #[serde(default, rename = "duration_sector_3")]
    pub sector_3: Option<f64>,
    #[serde(default)]
    pub is_pit_out_lap: bool,
    #[serde(default)]
    pub segments_sector_1: Option<Vec<Option<i32>>>,
    #[serde(default)]
    pub segments_sector_2: Option<Vec<Option<i32>>>,
    #[serde(default)]
    pub segments_sector_3: Option<Vec<Option<i32>>>,
    #[serde(default)]
    pub date_start: Option<DateTime<Utc>>,
}

impl Lap {
    /// Sector duration by 1-based index
    pub fn sector(&self, sector: u8) -> Option<f64> {
        match sector {
            1 => self.sector_1,
            2 => self.sector_2,
            3 => self.sector_3,
            _ => None,
        }
    }

    /// Whether all three sector durations were recorded
    pub fn has_all_sectors(&self) -> bool {
        self.sector_1.is_some() && self.sector_2.is_some() && self.sector_3.is_some()
    }

    /// `M:SS.mmm`, or a placeholder when the lap is untimed
    pub fn formatted_lap_time(&self) -> String {
        self.lap_duration
            .map(format_lap_time)
            .unwrap_or_else(|| NO_LAP_TIME.to_string())
    }

    /// Sector time with three decimals, or a placeholder
    pub fn formatted_sector(&self, sector: u8) -> String {
        self.sector(sector)
            .map(|s| format!("{:.3}", s))
            .unwrap_or_else(|| NO_SECTOR_TIME.to_string())
    }
}

/// Format seconds as `M:SS.mmm`, truncating below the millisecond
///
/// The value is first normalized to whole microseconds so that a duration like
/// 89.876, stored as 89.87599999..., still shows as `1:29.876`.
pub fn format_lap_time(seconds: f64) -> String {
    let micros = (seconds.max(0.0) * 1_000_000.0).round() as u64;
    let millis = micros / 1_000;

    let minutes = millis / 60_000;
    let secs = (millis / 1_000) % 60;
    let ms = millis % 1_000;

    format!("{}:{:02}.{:03}", minutes, secs, ms)
}
