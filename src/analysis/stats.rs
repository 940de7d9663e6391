//! Derived lap statistics

use crate::model::{format_lap_time, Lap};
use serde::Serialize;

/// Shown when no lap has a recorded duration
pub const NO_AVERAGE: &str = "N/A";

/// Summary of one driver's laps in one session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LapStatistics {
    /// Quickest timed lap
    pub fastest_lap: Option<Lap>,

    /// Mean of the timed laps as `M:SS.mmm`, or `N/A`
    pub average_lap_formatted: String,

    /// Every lap, timed or not
    pub total_lap_count: usize,
}

impl LapStatistics {
    /// Compute statistics for a set of laps
    pub fn from_laps(laps: &[Lap]) -> Self {
        Self {
            fastest_lap: fastest_lap(laps).cloned(),
            average_lap_formatted: average_lap_formatted(laps),
            total_lap_count: laps.len(),
        }
    }

    /// Fastest lap time as `M:SS.mmm`
    pub fn fastest_lap_formatted(&self) -> Option<String> {
        self.fastest_lap.as_ref().map(Lap::formatted_lap_time)
    }
}

/// Per-sector mean durations in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SectorAverages {
    pub sector_1: f64,
    pub sector_2: f64,
    pub sector_3: f64,
}

impl SectorAverages {
    /// Averages in sector order
    pub fn as_array(&self) -> [f64; 3] {
        [self.sector_1, self.sector_2, self.sector_3]
    }
}

/// Lap with the smallest duration; the earliest one in input order wins ties
pub fn fastest_lap(laps: &[Lap]) -> Option<&Lap> {
    laps.iter()
        .filter_map(|lap| lap.lap_duration.map(|d| (lap, d)))
        .fold(None, |best: Option<(&Lap, f64)>, (lap, d)| match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((lap, d)),
        })
        .map(|(lap, _)| lap)
}

/// Mean duration of the timed laps in seconds
pub fn average_lap(laps: &[Lap]) -> Option<f64> {
    mean(laps.iter().filter_map(|lap| lap.lap_duration))
}

/// Mean lap duration as `M:SS.mmm`, or `N/A` when no lap is timed
pub fn average_lap_formatted(laps: &[Lap]) -> String {
    average_lap(laps)
        .map(format_lap_time)
        .unwrap_or_else(|| NO_AVERAGE.to_string())
}

/// Mean of each sector over the laps where that sector is present
///
/// `None` unless at least one lap has all three sectors.
pub fn sector_averages(laps: &[Lap]) -> Option<SectorAverages> {
    if !laps.iter().any(Lap::has_all_sectors) {
        return None;
    }

    Some(SectorAverages {
        sector_1: mean(laps.iter().filter_map(|l| l.sector_1))?,
        sector_2: mean(laps.iter().filter_map(|l| l.sector_2))?,
        sector_3: mean(laps.iter().filter_map(|l| l.sector_3))?,
    })
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
