//! Lap times, statistics and speed trace for one driver in one session

use crate::analysis::{
    lap_chart_series, sector_averages, sector_chart_series, telemetry_chart_series, ChartEntry,
    LapStatistics,
};
use crate::model::{CarDataSample, Driver, Lap};
use crate::orchestrator::{keys, DataOrchestrator, LoadOutcome};
use crate::view::state::{ViewState, ViewStatus};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Default)]
struct Data {
    driver: Option<Driver>,
    laps: Vec<Lap>,
    statistics: Option<LapStatistics>,
    lap_chart: Vec<ChartEntry>,
    /// Empty unless at least one lap has all three sectors
    sector_chart: Vec<ChartEntry>,
    selected_lap: Option<u32>,
    car_data: Vec<CarDataSample>,
    telemetry_chart: Vec<ChartEntry>,
}

/// Telemetry of one driver in one session
pub struct TelemetryView {
    orchestrator: Arc<DataOrchestrator>,
    state: ViewState,
    session_key: u32,
    driver_number: u32,
    data: RwLock<Data>,
}

impl TelemetryView {
    pub fn new(orchestrator: Arc<DataOrchestrator>, session_key: u32, driver_number: u32) -> Self {
        Self {
            orchestrator,
            state: ViewState::new(),
            session_key,
            driver_number,
            data: RwLock::new(Data::default()),
        }
    }

    /// e.g. "VER - Telemetry" once the driver is known
    pub fn title(&self) -> String {
        match &self.data.read().driver {
            Some(driver) => format!("{} - Telemetry", driver.broadcast_name),
            None => "Telemetry".to_string(),
        }
    }

    pub fn driver(&self) -> Option<Driver> {
        self.data.read().driver.clone()
    }

    /// Laps in lap-number order
    pub fn laps(&self) -> Vec<Lap> {
        self.data.read().laps.clone()
    }

    pub fn statistics(&self) -> Option<LapStatistics> {
        self.data.read().statistics.clone()
    }

    pub fn lap_chart(&self) -> Vec<ChartEntry> {
        self.data.read().lap_chart.clone()
    }

    pub fn sector_chart(&self) -> Vec<ChartEntry> {
        self.data.read().sector_chart.clone()
    }

    pub fn selected_lap(&self) -> Option<u32> {
        self.data.read().selected_lap
    }

    /// Samples of the selected lap, ordered by time
    pub fn car_data(&self) -> Vec<CarDataSample> {
        self.data.read().car_data.clone()
    }

    pub fn telemetry_chart(&self) -> Vec<ChartEntry> {
        self.data.read().telemetry_chart.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn error_message(&self) -> Option<String> {
        self.state.error_message()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewStatus> {
        self.state.subscribe()
    }

    /// Load driver info and laps, and derive statistics and charts
    pub async fn load(&self) {
        let Some(_busy) = self.state.try_begin() else {
            debug!("Telemetry for driver {} already loading", self.driver_number);
            return;
        };
        self.load_laps().await;
    }

    async fn load_laps(&self) {
        self.state.clear_error();
        info!(
            "Loading telemetry for driver {} in session {}",
            self.driver_number, self.session_key
        );

        let drivers = self.orchestrator.drivers(self.session_key).await;
        if let Some(msg) = drivers.error_message() {
            warn!("Driver info for session {} unavailable: {}", self.session_key, msg);
        }
        let driver = drivers
            .records()
            .iter()
            .find(|d| d.driver_number == self.driver_number)
            .cloned();

        let mut laps = match self.orchestrator.laps(self.session_key, self.driver_number).await {
            LoadOutcome::Failed(msg) => {
                self.state.set_error(format!("Failed to load telemetry: {}", msg));
                Vec::new()
            }
            LoadOutcome::Empty => {
                self.state.set_error(format!("No laps found for driver {}", self.driver_number));
                Vec::new()
            }
            outcome => outcome.records().to_vec(),
        };
        laps.sort_by_key(|l| l.lap_number);

        let statistics = (!laps.is_empty()).then(|| LapStatistics::from_laps(&laps));
        let lap_chart = lap_chart_series(&laps);
        let sector_chart = sector_averages(&laps)
            .map(|avg| sector_chart_series(&avg))
            .unwrap_or_default();

        let mut data = self.data.write();
        data.driver = driver;
        data.laps = laps;
        data.statistics = statistics;
        data.lap_chart = lap_chart;
        data.sector_chart = sector_chart;
    }

    /// Load car data and build the speed trace for one lap
    ///
    /// Samples are narrowed to the lap's time window when the lap has a start
    /// time and duration; otherwise the whole session trace is used.
    pub async fn select_lap(&self, lap_number: u32) {
        let Some(_busy) = self.state.try_begin() else {
            debug!("Telemetry busy, ignoring lap {} selection", lap_number);
            return;
        };
        self.state.clear_error();
        self.load_lap_trace(lap_number).await;
    }

    async fn load_lap_trace(&self, lap_number: u32) {
        let lap = self
            .data
            .read()
            .laps
            .iter()
            .find(|l| l.lap_number == lap_number)
            .cloned();

        let samples = match self
            .orchestrator
            .car_data(self.session_key, self.driver_number)
            .await
        {
            LoadOutcome::Failed(msg) => {
                self.state.set_error(format!("Failed to load car data: {}", msg));
                Vec::new()
            }
            LoadOutcome::Empty => {
                self.state
                    .set_error(format!("No car data found for driver {}", self.driver_number));
                Vec::new()
            }
            outcome => outcome.records().to_vec(),
        };

        let mut car_data = lap
            .as_ref()
            .map(|lap| samples_in_lap(&samples, lap))
            .filter(|within| !within.is_empty())
            .unwrap_or(samples);
        car_data.sort_by_key(|s| s.date);
        let telemetry_chart = telemetry_chart_series(&car_data);

        debug!(
            "Lap {}: {} samples, {} charted",
            lap_number,
            car_data.len(),
            telemetry_chart.len()
        );

        let mut data = self.data.write();
        data.selected_lap = Some(lap_number);
        data.car_data = car_data;
        data.telemetry_chart = telemetry_chart;
    }

    /// Drop this driver's cached laps, car data and session drivers, then load again
    ///
    /// Does nothing while a load is running.
    pub async fn refresh(&self) {
        let Some(_busy) = self.state.try_begin() else {
            debug!("Telemetry for driver {} busy, refresh skipped", self.driver_number);
            return;
        };
        self.orchestrator.invalidate(&keys::drivers(self.session_key));
        self.orchestrator
            .invalidate(&keys::laps(self.session_key, self.driver_number));
        self.orchestrator
            .invalidate(&keys::car_data(self.session_key, self.driver_number));
        self.load_laps().await;

        // A lap-load error stays visible through the trace reload
        if let Some(lap_number) = self.selected_lap() {
            self.load_lap_trace(lap_number).await;
        }
    }
}

/// Samples inside `[date_start, date_start + lap_duration)`
///
/// Empty when the lap has no usable window: a missing start or duration, a
/// duration that is negative or not finite, or an end beyond the calendar.
fn samples_in_lap(samples: &[CarDataSample], lap: &Lap) -> Vec<CarDataSample> {
    let (Some(start), Some(duration)) = (lap.date_start, lap.lap_duration) else {
        return Vec::new();
    };
    if !duration.is_finite() || duration < 0.0 {
        return Vec::new();
    }
    let micros = (duration * 1_000_000.0).round();
    if micros >= i64::MAX as f64 {
        return Vec::new();
    }
    let Some(end) = start.checked_add_signed(chrono::Duration::microseconds(micros as i64)) else {
        return Vec::new();
    };

    samples
        .iter()
        .filter(|s| s.date >= start && s.date < end)
        .cloned()
        .collect()
}
