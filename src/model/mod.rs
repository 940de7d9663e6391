//! OpenF1 record types
//!
//! Records are deserialized straight from the API's snake_case JSON and are
//! never mutated after fetch. Sessions relate to everything else through
//! `session_key`; laps and car data samples relate to a driver through
//! `driver_number`.

pub mod driver;
pub mod lap;
pub mod meeting;
pub mod session;
pub mod telemetry;
pub mod weather;

pub use driver::Driver;
pub use lap::{format_lap_time, Lap};
pub use meeting::Meeting;
pub use session::{Session, SessionKind, SessionStatus};
pub use telemetry::{CarDataSample, DrsState, Position};
pub use weather::Weather;

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolOrNumber {
    Bool(bool),
    Number(f64),
}

/// Accepts `true`/`false`, a numeric level (non-zero means set) or `null`
pub(crate) fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<BoolOrNumber>::deserialize(deserializer)? {
        Some(BoolOrNumber::Bool(b)) => b,
        Some(BoolOrNumber::Number(n)) => n > 0.0,
        None => false,
    })
}
