//! Busy/error state shared by every view

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

/// Snapshot of a view's observable state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewStatus {
    pub busy: bool,
    pub error: Option<String>,
}

/// Busy flag plus last error, published on a watch channel
///
/// At most one load runs per view: [`ViewState::try_begin`] hands out a guard
/// only when the view is idle, and the flag drops back when the guard does.
pub struct ViewState {
    busy: AtomicBool,
    status: watch::Sender<ViewStatus>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        let (status, _) = watch::channel(ViewStatus::default());
        Self {
            busy: AtomicBool::new(false),
            status,
        }
    }

    /// Mark the view busy; `None` if a load is already running
    pub fn try_begin(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        self.status.send_modify(|s| s.busy = true);
        Some(BusyGuard { state: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Last error message, cleared at the start of every load
    pub fn error_message(&self) -> Option<String> {
        self.status.borrow().error.clone()
    }

    pub fn set_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.status.send_modify(|s| s.error = Some(message));
    }

    pub fn clear_error(&self) {
        self.status.send_if_modified(|s| s.error.take().is_some());
    }

    /// Receive every busy/error change from now on
    pub fn subscribe(&self) -> watch::Receiver<ViewStatus> {
        self.status.subscribe()
    }
}

/// Clears the busy flag on drop, including on early return
pub struct BusyGuard<'a> {
    state: &'a ViewState,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state.busy.store(false, Ordering::Release);
        self.state.status.send_modify(|s| s.busy = false);
    }
}
