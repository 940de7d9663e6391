//! Season session list, grouped by meeting

use crate::grouping::{build_groups, SessionFilter, SessionGroup};
use crate::model::{Meeting, Session};
use crate::orchestrator::{keys, DataOrchestrator, LoadOutcome, Records};
use crate::view::state::{ViewState, ViewStatus};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

struct Selection {
    year: i32,
    filter: SessionFilter,
}

#[derive(Default)]
struct Data {
    sessions: Records<Session>,
    meetings: Records<Meeting>,
    groups: Vec<SessionGroup>,
}

/// Sessions of one season, filtered by type and grouped by meeting
pub struct SessionListView {
    orchestrator: Arc<DataOrchestrator>,
    state: ViewState,
    selection: RwLock<Selection>,
    data: RwLock<Data>,
}

impl SessionListView {
    pub fn new(orchestrator: Arc<DataOrchestrator>, year: i32) -> Self {
        Self {
            orchestrator,
            state: ViewState::new(),
            selection: RwLock::new(Selection {
                year,
                filter: SessionFilter::All,
            }),
            data: RwLock::new(Data::default()),
        }
    }

    pub fn year(&self) -> i32 {
        self.selection.read().year
    }

    pub fn filter(&self) -> SessionFilter {
        self.selection.read().filter.clone()
    }

    /// Switch season and load it
    ///
    /// Ignored while a load is running; the season stays as it was.
    pub async fn set_year(&self, year: i32) {
        let Some(_busy) = self.state.try_begin() else {
            debug!("Session list busy, season {} not selected", year);
            return;
        };
        self.selection.write().year = year;
        self.load_selected().await;
    }

    /// Apply a filter token to the sessions already loaded
    ///
    /// Rebuilds the groups from scratch, so every group comes back expanded.
    pub fn set_filter(&self, token: &str) {
        let filter = SessionFilter::parse(token);
        debug!("Session filter set to {}", filter);
        self.selection.write().filter = filter;
        self.rebuild_groups();
    }

    /// Flip one group's expanded flag; `false` if the index is out of range
    pub fn toggle_group(&self, index: usize) -> bool {
        match self.data.write().groups.get_mut(index) {
            Some(group) => {
                group.toggle();
                true
            }
            None => false,
        }
    }

    pub fn groups(&self) -> Vec<SessionGroup> {
        self.data.read().groups.clone()
    }

    /// Unfiltered sessions of the season
    pub fn sessions(&self) -> Records<Session> {
        self.data.read().sessions.clone()
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

    /// Load sessions and meetings for the selected season
    ///
    /// Returns immediately if a load is already running.
    pub async fn load(&self) {
        let Some(_busy) = self.state.try_begin() else {
            debug!("Session list already loading");
            return;
        };
        self.load_selected().await;
    }

    async fn load_selected(&self) {
        self.state.clear_error();

        let year = self.year();
        info!("Loading sessions for {}", year);

        let sessions = match self.orchestrator.sessions(year).await {
            LoadOutcome::Failed(msg) => {
                self.state.set_error(format!("Failed to load sessions: {}", msg));
                Records::default()
            }
            LoadOutcome::Empty => {
                self.state.set_error(format!("No sessions found for {}", year));
                Records::default()
            }
            outcome => outcome.into_value().unwrap_or_default(),
        };

        // Meetings only add names and dates; groups still build without them
        let meetings = if sessions.is_empty() {
            Records::default()
        } else {
            let outcome = self.orchestrator.meetings(year).await;
            if let Some(msg) = outcome.error_message() {
                warn!("Meetings for {} unavailable: {}", year, msg);
            }
            outcome.into_value().unwrap_or_default()
        };

        {
            let mut data = self.data.write();
            data.sessions = sessions;
            data.meetings = meetings;
        }
        self.rebuild_groups();
    }

    /// Drop this season's cached sessions and meetings, then load again
    ///
    /// Does nothing while a load is running.
    pub async fn refresh(&self) {
        let Some(_busy) = self.state.try_begin() else {
            debug!("Session list busy, refresh skipped");
            return;
        };
        let year = self.year();
        self.orchestrator.invalidate(&keys::sessions(year));
        self.orchestrator.invalidate(&keys::meetings(year));
        self.load_selected().await;
    }

    fn rebuild_groups(&self) {
        let filter = self.filter();
        let mut data = self.data.write();
        let groups = build_groups(&data.sessions, &data.meetings, &filter);
        data.groups = groups;
        debug!("{} session groups for filter {}", data.groups.len(), filter);
    }
}
