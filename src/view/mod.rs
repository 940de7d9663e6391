//! UI-facing consumers
//!
//! Each view owns one selector, a busy flag and an error message, and exposes
//! the derived collections it last loaded. Views take `&self` everywhere so
//! they can be shared behind an `Arc`; a `load` issued while another is running
//! on the same view returns at once without touching anything.
//!
//! `refresh` invalidates only the cache keys of the view's own selector before
//! loading again, so other views keep their cached data.

pub mod driver_list;
pub mod session_detail;
pub mod session_list;
pub mod state;
pub mod telemetry;

pub use driver_list::DriverListView;
pub use session_detail::SessionDetailView;
pub use session_list::SessionListView;
pub use state::{BusyGuard, ViewState, ViewStatus};
pub use telemetry::TelemetryView;
