//! Chart series built from laps and telemetry samples
//!
//! Series are recomputed on demand and never cached; only their inputs are.

use crate::analysis::stats::SectorAverages;
use crate::model::{format_lap_time, CarDataSample, Lap};
use serde::Serialize;

/// Maximum number of telemetry samples plotted
pub const TELEMETRY_WINDOW: usize = 100;

/// Rendering colour of a chart entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartColor {
    LapTime,
    Sector,
    Speed,
    /// Speed sample taken while the brake was applied
    Braking,
}

impl ChartColor {
    /// Hex RGB for renderers that want a literal colour
    pub fn hex(&self) -> &'static str {
        match self {
            ChartColor::LapTime => "#E10600",
            ChartColor::Sector => "#00D2BE",
            ChartColor::Speed => "#1E90FF",
            ChartColor::Braking => "#FF8700",
        }
    }
}

/// One bar or point of a chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartEntry {
    pub value: f64,
    pub label: String,
    pub value_label: String,
    pub color: ChartColor,
}

/// One entry per timed lap, ascending by lap number
pub fn lap_chart_series(laps: &[Lap]) -> Vec<ChartEntry> {
    let mut timed: Vec<(&Lap, f64)> = laps
        .iter()
        .filter_map(|lap| lap.lap_duration.map(|d| (lap, d)))
        .collect();
    timed.sort_by_key(|(lap, _)| lap.lap_number);

    timed
        .into_iter()
        .map(|(lap, duration)| ChartEntry {
            value: duration,
            label: format!("L{}", lap.lap_number),
            value_label: format_lap_time(duration),
            color: ChartColor::LapTime,
        })
        .collect()
}

/// `S1`, `S2`, `S3` entries from sector averages
pub fn sector_chart_series(averages: &SectorAverages) -> Vec<ChartEntry> {
    averages
        .as_array()
        .iter()
        .enumerate()
        .map(|(i, &avg)| ChartEntry {
            value: avg,
            label: format!("S{}", i + 1),
            value_label: format!("{:.3}s", avg),
            color: ChartColor::Sector,
        })
        .collect()
}

/// Speed trace of the first [`TELEMETRY_WINDOW`] samples by timestamp
pub fn telemetry_chart_series(samples: &[CarDataSample]) -> Vec<ChartEntry> {
    let mut ordered: Vec<&CarDataSample> = samples.iter().collect();
    ordered.sort_by_key(|s| s.date);

    ordered
        .into_iter()
        .take(TELEMETRY_WINDOW)
        .enumerate()
        .map(|(i, sample)| ChartEntry {
            value: f64::from(sample.speed),
            label: i.to_string(),
            value_label: sample.formatted_speed(),
            color: if sample.is_braking() {
                ChartColor::Braking
            } else {
                ChartColor::Speed
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn lap(number: u32, duration: Option<f64>) -> Lap {
        Lap {
            session_key: 1,
            driver_number: 16,
            lap_number: number,
            lap_duration: duration,
            sector_1: None,
            sector_2: None,
            sector_3: None,
            is_pit_out_lap: false,
            segments_sector_1: None,
            segments_sector_2: None,
            segments_sector_3: None,
            date_start: None,
        }
    }

    fn sample(offset_ms: i64, speed: u32, brake: bool) -> CarDataSample {
        CarDataSample {
            session_key: 1,
            driver_number: 16,
            date: Utc.with_ymd_and_hms(2024, 3, 2, 15, 0, 0).unwrap() + Duration::milliseconds(offset_ms),
            speed,
            rpm: 11_000,
            n_gear: 7,
            throttle: 99,
            brake,
            drs: 0,
        }
    }

    #[test]
    fn test_lap_series_sorted_and_timed_only() {
        let laps = vec![lap(3, Some(90.5)), lap(1, Some(91.234)), lap(2, None)];
        let series = lap_chart_series(&laps);

        let labels: Vec<_> = series.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["L1", "L3"]);
        assert_eq!(series[0].value, 91.234);
        assert_eq!(series[0].value_label, "1:31.234");
        assert_eq!(series[1].value_label, "1:30.500");
    }

    #[test]
    fn test_sector_series() {
        let series = sector_chart_series(&SectorAverages {
            sector_1: 28.5,
            sector_2: 35.25,
            sector_3: 26.0,
        });

        let labels: Vec<_> = series.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["S1", "S2", "S3"]);
        assert_eq!(series[1].value, 35.25);
        assert_eq!(series[1].value_label, "35.250s");
    }

    #[test]
    fn test_telemetry_window_keeps_first_hundred_by_time() {
        // Reverse insertion order so sorting is exercised
        let samples: Vec<_> = (0..250).rev().map(|i| sample(i * 250, i as u32, false)).collect();
        let series = telemetry_chart_series(&samples);

        assert_eq!(series.len(), TELEMETRY_WINDOW);
        assert_eq!(series[0].value, 0.0);
        assert_eq!(series[99].value, 99.0);
        assert_eq!(series[99].label, "99");
        assert!(series.iter().all(|e| e.value < 100.0));
    }

    #[test]
    fn test_braking_samples_get_distinct_colour() {
        let samples = vec![sample(0, 300, false), sample(10, 120, true)];
        let series = telemetry_chart_series(&samples);

        assert_eq!(series[0].color, ChartColor::Speed);
        assert_eq!(series[1].color, ChartColor::Braking);
        assert_eq!(series[1].value_label, "120 km/h");
        assert_ne!(ChartColor::Speed.hex(), ChartColor::Braking.hex());
    }

    #[test]
    fn test_series_are_idempotent() {
        let laps = vec![lap(2, Some(90.0)), lap(1, Some(91.0))];
        assert_eq!(lap_chart_series(&laps), lap_chart_series(&laps));

        let samples = vec![sample(5, 200, true), sample(0, 210, false)];
        assert_eq!(telemetry_chart_series(&samples), telemetry_chart_series(&samples));
    }
}
