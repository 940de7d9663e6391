//! One session with its entry list and current weather

use crate::model::{weather, Driver, Session, Weather};
use crate::orchestrator::{keys, DataOrchestrator, LoadOutcome};
use crate::view::state::{ViewState, ViewStatus};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Default)]
struct Data {
    session: Option<Arc<Session>>,
    drivers: Vec<Driver>,
    weather: Option<Weather>,
}

/// Session metadata, drivers sorted by number, and the latest weather reading
pub struct SessionDetailView {
    orchestrator: Arc<DataOrchestrator>,
    state: ViewState,
    session_key: u32,
    data: RwLock<Data>,
}

impl SessionDetailView {
    pub fn new(orchestrator: Arc<DataOrchestrator>, session_key: u32) -> Self {
        Self {
            orchestrator,
            state: ViewState::new(),
            session_key,
            data: RwLock::new(Data::default()),
        }
    }

    pub fn session_key(&self) -> u32 {
        self.session_key
    }

    /// e.g. "Race - Sakhir" once the session is loaded
    pub fn title(&self) -> String {
        match &self.data.read().session {
            Some(session) => format!("{} - {}", session.session_name, session.circuit_short_name),
            None => "Session Details".to_string(),
        }
    }

    pub fn session(&self) -> Option<Arc<Session>> {
        self.data.read().session.clone()
    }

    pub fn drivers(&self) -> Vec<Driver> {
        self.data.read().drivers.clone()
    }

    pub fn current_weather(&self) -> Option<Weather> {
        self.data.read().weather.clone()
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
            debug!("Session {} already loading", self.session_key);
            return;
        };
        self.load_session().await;
    }

    async fn load_session(&self) {
        self.state.clear_error();
        info!("Loading session {}", self.session_key);

        let session = match self.orchestrator.session(self.session_key).await {
            LoadOutcome::Failed(msg) => {
                self.state.set_error(format!("Failed to load session data: {}", msg));
                None
            }
            LoadOutcome::Empty => {
                self.state.set_error("Session not found");
                None
            }
            outcome => outcome.into_value(),
        };

        let Some(session) = session else {
            *self.data.write() = Data::default();
            return;
        };

        let drivers = self.orchestrator.drivers(self.session_key).await;
        if let Some(msg) = drivers.error_message() {
            self.state.set_error(format!("Failed to load drivers: {}", msg));
        }
        let mut drivers = drivers.records().to_vec();
        drivers.sort_by_key(|d| d.driver_number);

        let readings = self.orchestrator.weather(self.session_key).await;
        if let Some(msg) = readings.error_message() {
            warn!("Weather for session {} unavailable: {}", self.session_key, msg);
        }
        let weather = weather::latest(readings.records()).cloned();

        *self.data.write() = Data {
            session: Some(session),
            drivers,
            weather,
        };
    }

    /// Drop this session's cached metadata, drivers and weather, then load again
    pub async fn refresh(&self) {
        let Some(_busy) = self.state.try_begin() else {
            debug!("Session {} busy, refresh skipped", self.session_key);
            return;
        };
        self.orchestrator.invalidate(&keys::session(self.session_key));
        self.orchestrator.invalidate(&keys::drivers(self.session_key));
        self.orchestrator.invalidate(&keys::weather(self.session_key));
        self.load_session().await;
    }
}
