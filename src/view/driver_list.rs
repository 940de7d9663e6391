//! Season driver roster

use crate::model::Driver;
use crate::orchestrator::{keys, DataOrchestrator, LoadOutcome};
use crate::view::state::{ViewState, ViewStatus};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// Drivers of a season, taken from its most recent race
pub struct DriverListView {
    orchestrator: Arc<DataOrchestrator>,
    state: ViewState,
    year: RwLock<i32>,
    drivers: RwLock<Vec<Driver>>,
}

impl DriverListView {
    pub fn new(orchestrator: Arc<DataOrchestrator>, year: i32) -> Self {
        Self {
            orchestrator,
            state: ViewState::new(),
            year: RwLock::new(year),
            drivers: RwLock::new(Vec::new()),
        }
    }

    pub fn year(&self) -> i32 {
        *self.year.read()
    }

    /// Switch season and load it; ignored while a load is running
    pub async fn set_year(&self, year: i32) {
        let Some(_busy) = self.state.try_begin() else {
            debug!("Driver list busy, season {} not selected", year);
            return;
        };
        *self.year.write() = year;
        self.load_roster().await;
    }

    /// Drivers sorted by car number
    pub fn drivers(&self) -> Vec<Driver> {
        self.drivers.read().clone()
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

    pub async fn load(&self) {
        let Some(_busy) = self.state.try_begin() else {
            debug!("Driver list already loading");
            return;
        };
        self.load_roster().await;
    }

    async fn load_roster(&self) {
        self.state.clear_error();

        let year = self.year();
        info!("Loading driver roster for {}", year);

        let mut drivers = match self.orchestrator.season_drivers(year).await {
            LoadOutcome::Failed(msg) => {
                self.state.set_error(format!("Failed to load drivers: {}", msg));
                Vec::new()
            }
            LoadOutcome::Empty => {
                self.state.set_error(format!("No drivers found for {}", year));
                Vec::new()
            }
            outcome => outcome.records().to_vec(),
        };
        drivers.sort_by_key(|d| d.driver_number);

        *self.drivers.write() = drivers;
    }

    /// Drop the cached roster for this season, then load again
    pub async fn refresh(&self) {
        let Some(_busy) = self.state.try_begin() else {
            debug!("Driver list busy, refresh skipped");
            return;
        };
        self.orchestrator.invalidate(&keys::season_drivers(self.year()));
        self.load_roster().await;
    }
}
