//! Lap statistics and chart series
//!
//! Pure functions over record slices handed out by the orchestrator. Nothing
//! here touches the cache or mutates its input, so recomputing on the same
//! records always gives the same result.

pub mod chart;
pub mod stats;

pub use chart::{
    lap_chart_series, sector_chart_series, telemetry_chart_series, ChartColor, ChartEntry,
    TELEMETRY_WINDOW,
};
pub use stats::{average_lap, average_lap_formatted, fastest_lap, sector_averages, LapStatistics, SectorAverages};
