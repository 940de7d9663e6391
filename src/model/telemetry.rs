//! Car telemetry samples and running positions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One car telemetry sample (~3.7 Hz in the OpenF1 feed)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarDataSample {
    pub session_key: u32,
    pub driver_number: u32,
    pub date: DateTime<Utc>,
    /// km/h
    #[serde(default)]
    pub speed: u32,
    #[serde(default)]
    pub rpm: u32,
    #[serde(default)]
    pub n_gear: u8,
    /// Percent, 0..=100 (occasionally reported slightly above)
    #[serde(default)]
    pub throttle: u8,
    /// The feed reports either a boolean or a 0/100 level
    #[serde(default, deserialize_with = "super::flag")]
    pub brake: bool,
    #[serde(default)]
    pub drs: u8,
}

impl CarDataSample {
    pub fn is_braking(&self) -> bool {
        self.brake
    }

    pub fn drs_state(&self) -> DrsState {
        DrsState::from_code(self.drs)
    }

    pub fn formatted_speed(&self) -> String {
        format!("{} km/h", self.speed)
    }

    pub fn throttle_percent(&self) -> String {
        format!("{}%", self.throttle)
    }
}

/// Decoded DRS flap status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrsState {
    Off,
    /// Eligible, not yet opened
    Available,
    Active,
    Unknown,
}

impl DrsState {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 | 1 => DrsState::Off,
            8 => DrsState::Available,
            10 | 12 | 14 => DrsState::Active,
            _ => DrsState::Unknown,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, DrsState::Active)
    }
}

impl fmt::Display for DrsState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrsState::Off => write!(f, "Off"),
            DrsState::Available => write!(f, "Available"),
            DrsState::Active => write!(f, "Active"),
            DrsState::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A driver's running position at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub session_key: u32,
    pub driver_number: u32,
    pub date: DateTime<Utc>,
    pub position: u32,
}

impl Position {
    /// "1st", "2nd", "3rd", "11th", "22nd"
    pub fn ordinal(&self) -> String {
        let n = self.position;
        let suffix = match (n % 10, n % 100) {
            (_, 11..=13) => "th",
            (1, _) => "st",
            (2, _) => "nd",
            (3, _) => "rd",
            _ => "th",
        };
        format!("{}{}", n, suffix)
    }

    pub fn is_on_podium(&self) -> bool {
        (1..=3).contains(&self.position)
    }

    pub fn is_in_points(&self) -> bool {
        (1..=10).contains(&self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_car_data_with_numeric_brake() {
        let json = r#"{
            "brake": 100,
            "date": "2023-09-16T13:08:19.923000+00:00",
            "driver_number": 55,
            "drs": 12,
            "meeting_key": 1219,
            "n_gear": 8,
            "rpm": 11141,
            "session_key": 9159,
            "speed": 315,
            "throttle": 99
        }"#;

        let sample: CarDataSample = serde_json::from_str(json).unwrap();
        assert!(sample.is_braking());
        assert_eq!(sample.drs_state(), DrsState::Active);
        assert_eq!(sample.formatted_speed(), "315 km/h");
        assert_eq!(sample.throttle_percent(), "99%");
    }

    #[test]
    fn test_deserialize_car_data_with_bool_brake() {
        let json = r#"{
            "brake": false,
            "date": "2023-09-16T13:08:20.123000+00:00",
            "driver_number": 55,
            "session_key": 9159,
            "speed": 120
        }"#;

        let sample: CarDataSample = serde_json::from_str(json).unwrap();
        assert!(!sample.is_braking());
        assert_eq!(sample.drs_state(), DrsState::Off);
    }

    #[test]
    fn test_drs_codes() {
        assert_eq!(DrsState::from_code(8), DrsState::Available);
        assert!(DrsState::from_code(14).is_active());
        assert_eq!(DrsState::from_code(3), DrsState::Unknown);
        assert_eq!(DrsState::Available.to_string(), "Available");
    }

    #[test]
    fn test_position_ordinals() {
        let at = |position| Position {
            session_key: 1,
            driver_number: 1,
            date: Utc::now(),
            position,
        };

        assert_eq!(at(1).ordinal(), "1st");
        assert_eq!(at(2).ordinal(), "2nd");
        assert_eq!(at(3).ordinal(), "3rd");
        assert_eq!(at(11).ordinal(), "11th");
        assert_eq!(at(12).ordinal(), "12th");
        assert_eq!(at(21).ordinal(), "21st");
        assert_eq!(at(22).ordinal(), "22nd");

        assert!(at(3).is_on_podium());
        assert!(!at(4).is_on_podium());
        assert!(at(10).is_in_points());
        assert!(!at(11).is_in_points());
    }
}
