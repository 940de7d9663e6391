//! Track weather readings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// One weather reading (about once a minute)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub session_key: u32,
    pub date: DateTime<Utc>,
    /// °C
    #[serde(default)]
    pub air_temperature: f64,
    /// °C
    #[serde(default)]
    pub track_temperature: f64,
    /// Percent
    #[serde(default)]
    pub humidity: f64,
    /// mbar
    #[serde(default)]
    pub pressure: f64,
    #[serde(default, deserialize_with = "super::flag")]
    pub rainfall: bool,
    /// Degrees, 0..360
    #[serde(default)]
    pub wind_direction: u16,
    /// m/s
    #[serde(default)]
    pub wind_speed: f64,
}

impl Weather {
    pub fn condition(&self) -> &'static str {
        if self.rainfall {
            "Rainy"
        } else {
            "Dry"
        }
    }

    /// Nearest 8-point compass direction
    pub fn wind_compass(&self) -> &'static str {
        let index = (f64::from(self.wind_direction) / 45.0).round() as usize % COMPASS.len();
        COMPASS[index]
    }

    pub fn formatted_air_temp(&self) -> String {
        format!("{:.1}°C", self.air_temperature)
    }

    pub fn formatted_track_temp(&self) -> String {
        format!("{:.1}°C", self.track_temperature)
    }

    pub fn formatted_wind(&self) -> String {
        format!("{:.1} m/s {}", self.wind_speed, self.wind_compass())
    }
}

/// The most recent reading, if any
pub fn latest(readings: &[Weather]) -> Option<&Weather> {
    readings.iter().max_by_key(|w| w.date)
}
