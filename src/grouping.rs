//! Session filtering and per-meeting grouping
//!
//! Groups are rebuilt from scratch on every filter change or reload. A group
//! is identified by meeting key, location, circuit, country and start date.
//! The start date is the meeting's own `date_start` when the meeting record is
//! known; otherwise it falls back to the session's `date_start`, so sessions of
//! an unknown meeting that start at different times end up in separate groups.

use crate::model::{Meeting, Session};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Filter choices offered to the user, in display order
pub const FILTER_OPTIONS: [&str; 5] = ["All", "Practice", "Qualifying", "Sprint", "Race"];

/// Session-type filter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionFilter {
    #[default]
    All,
    /// Case-insensitive substring of the session type, stored lowercased
    Type(String),
}

impl SessionFilter {
    /// Parse a filter token; `All` (any case) and blank mean no filtering
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() || token.eq_ignore_ascii_case("all") {
            SessionFilter::All
        } else {
            SessionFilter::Type(token.to_lowercase())
        }
    }

    pub fn matches(&self, session: &Session) -> bool {
        match self {
            SessionFilter::All => true,
            SessionFilter::Type(needle) => session.session_type.to_lowercase().contains(needle),
        }
    }
}

impl fmt::Display for SessionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionFilter::All => f.write_str("All"),
            SessionFilter::Type(t) => f.write_str(t),
        }
    }
}

/// Sessions of one meeting, ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionGroup {
    pub meeting_key: u32,
    pub meeting_name: String,
    pub location: String,
    pub circuit_short_name: String,
    pub country_name: String,
    pub date_start: DateTime<Utc>,
    /// Ordered Practice, Qualifying, Sprint, Race, then anything else
    pub sessions: Vec<Session>,
    pub expanded: bool,
}

impl SessionGroup {
    /// Flip the expanded/collapsed display flag
    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    /// e.g. "Bahrain Grand Prix - Sakhir"
    pub fn header(&self) -> String {
        format!("{} - {}", self.meeting_name, self.location)
    }

    /// e.g. "5 sessions"
    pub fn session_count_label(&self) -> String {
        let count = self.sessions.len();
        format!("{} session{}", count, if count == 1 { "" } else { "s" })
    }

    /// e.g. "Mar 02, 2024"
    pub fn formatted_date(&self) -> String {
        self.date_start.format("%b %d, %Y").to_string()
    }
}

/// Keep the sessions accepted by `filter`, in input order
pub fn filter_sessions<'a>(sessions: &'a [Session], filter: &SessionFilter) -> Vec<&'a Session> {
    sessions.iter().filter(|s| filter.matches(s)).collect()
}

#[derive(PartialEq, Eq, Hash)]
struct GroupIdentity<'a> {
    meeting_key: u32,
    location: &'a str,
    circuit_short_name: &'a str,
    country_name: &'a str,
    date_start: DateTime<Utc>,
}

/// Partition sessions into meeting groups, most recent first
///
/// `meetings` may be empty; it only supplies names and start dates.
pub fn group_sessions<'a, I>(sessions: I, meetings: &[Meeting]) -> Vec<SessionGroup>
where
    I: IntoIterator<Item = &'a Session>,
{
    let meetings: HashMap<u32, &Meeting> = meetings.iter().map(|m| (m.meeting_key, m)).collect();

    let mut index: HashMap<GroupIdentity<'a>, usize> = HashMap::new();
    let mut groups: Vec<SessionGroup> = Vec::new();

    for session in sessions {
        let meeting = meetings.get(&session.meeting_key);
        let identity = GroupIdentity {
            meeting_key: session.meeting_key,
            location: &session.location,
            circuit_short_name: &session.circuit_short_name,
            country_name: &session.country_name,
            date_start: meeting.map_or(session.date_start, |m| m.date_start),
        };

        let slot = *index.entry(identity).or_insert_with(|| {
            groups.push(SessionGroup {
                meeting_key: session.meeting_key,
                meeting_name: meeting
                    .map(|m| m.meeting_name.clone())
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| session.location.clone()),
                location: session.location.clone(),
                circuit_short_name: session.circuit_short_name.clone(),
                country_name: session.country_name.clone(),
                date_start: meeting.map_or(session.date_start, |m| m.date_start),
                sessions: Vec::new(),
                expanded: true,
            });
            groups.len() - 1
        });
        groups[slot].sessions.push(session.clone());
    }

    for group in &mut groups {
        group.sessions.sort_by_key(|s| s.kind().precedence());
    }
    groups.sort_by(|a, b| b.date_start.cmp(&a.date_start));

    groups
}

/// Filter then group in one step
pub fn build_groups(sessions: &[Session], meetings: &[Meeting], filter: &SessionFilter) -> Vec<SessionGroup> {
    group_sessions(filter_sessions(sessions, filter), meetings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, hour, 0, 0).unwrap()
    }

    fn session(key: u32, meeting_key: u32, session_type: &str, start: DateTime<Utc>) -> Session {
        Session {
            session_key: key,
            session_name: session_type.to_string(),
            session_type: session_type.to_string(),
            date_start: start,
            date_end: start + chrono::Duration::hours(2),
            meeting_key,
            location: format!("Location {}", meeting_key),
            country_name: "Country".to_string(),
            country_code: "CC".to_string(),
            circuit_short_name: format!("Circuit {}", meeting_key),
            gmt_offset: "00:00:00".to_string(),
            year: 2024,
        }
    }

    fn meeting(key: u32, name: &str, start: DateTime<Utc>) -> Meeting {
        Meeting {
            meeting_key: key,
            meeting_name: name.to_string(),
            meeting_official_name: name.to_uppercase(),
            location: format!("Location {}", key),
            country_name: "Country".to_string(),
            country_code: "CC".to_string(),
            circuit_short_name: format!("Circuit {}", key),
            circuit_key: key,
            date_start: start,
            gmt_offset: "00:00:00".to_string(),
            year: 2024,
        }
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!(SessionFilter::parse("All"), SessionFilter::All);
        assert_eq!(SessionFilter::parse("aLL"), SessionFilter::All);
        assert_eq!(SessionFilter::parse("  "), SessionFilter::All);
        assert_eq!(
            SessionFilter::parse("Practice"),
            SessionFilter::Type("practice".to_string())
        );
    }

    #[test]
    fn test_every_filter_option_selects_its_sessions() {
        let sessions = vec![
            session(1, 1, "Practice 2", at(3, 1, 10)),
            session(2, 1, "Sprint Qualifying", at(3, 1, 15)),
            session(3, 1, "Sprint", at(3, 2, 11)),
            session(4, 1, "Race", at(3, 2, 15)),
        ];

        let counts: Vec<_> = FILTER_OPTIONS
            .iter()
            .map(|option| filter_sessions(&sessions, &SessionFilter::parse(option)).len())
            .collect();
        assert_eq!(counts, [4, 1, 1, 2, 1]);
        assert_eq!(SessionFilter::parse(FILTER_OPTIONS[0]), SessionFilter::All);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let sessions = vec![
            session(1, 1, "Practice 1", at(3, 1, 10)),
            session(2, 1, "Qualifying", at(3, 1, 15)),
            session(3, 1, "Race", at(3, 2, 15)),
        ];

        let kept = filter_sessions(&sessions, &SessionFilter::parse("practice"));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].session_type, "Practice 1");

        assert_eq!(filter_sessions(&sessions, &SessionFilter::All).len(), 3);
        assert!(filter_sessions(&sessions, &SessionFilter::parse("sprint")).is_empty());
    }

    #[test]
    fn test_one_meeting_forms_one_ordered_group() {
        let sessions = vec![
            session(3, 7, "Race", at(3, 2, 15)),
            session(2, 7, "Qualifying", at(3, 1, 16)),
        ];
        let meetings = vec![meeting(7, "Bahrain Grand Prix", at(2, 29, 11))];

        let groups = group_sessions(&sessions, &meetings);

        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        let kinds: Vec<_> = group.sessions.iter().map(|s| s.session_type.as_str()).collect();
        assert_eq!(kinds, ["Qualifying", "Race"]);
        assert_eq!(group.meeting_name, "Bahrain Grand Prix");
        assert_eq!(group.header(), "Bahrain Grand Prix - Location 7");
        assert_eq!(group.session_count_label(), "2 sessions");
        assert_eq!(group.date_start, at(2, 29, 11));
        assert!(group.expanded);
    }

    #[test]
    fn test_groups_sorted_most_recent_first() {
        let sessions = vec![
            session(1, 1, "Race", at(3, 2, 15)),
            session(2, 3, "Race", at(4, 7, 5)),
            session(3, 2, "Race", at(3, 24, 4)),
        ];
        let meetings = vec![
            meeting(1, "Bahrain", at(3, 2, 15)),
            meeting(2, "Australia", at(3, 24, 4)),
            meeting(3, "Japan", at(4, 7, 5)),
        ];

        let groups = group_sessions(&sessions, &meetings);
        let names: Vec<_> = groups.iter().map(|g| g.meeting_name.as_str()).collect();
        assert_eq!(names, ["Japan", "Australia", "Bahrain"]);
    }

    #[test]
    fn test_precedence_order_is_stable() {
        let start = at(5, 5, 12);
        let sessions = vec![
            session(5, 9, "Race", start),
            session(4, 9, "Practice 2", start),
            session(1, 9, "Practice 1", start),
            session(6, 9, "Demo Run", start),
            session(3, 9, "Sprint", start),
        ];

        let groups = group_sessions(&sessions, &[]);
        assert_eq!(groups.len(), 1);

        let keys: Vec<_> = groups[0].sessions.iter().map(|s| s.session_key).collect();
        assert_eq!(keys, [4, 1, 3, 5, 6]);
        // No meeting record: name falls back to the location
        assert_eq!(groups[0].meeting_name, "Location 9");
    }

    #[test]
    fn test_unknown_meeting_fragments_by_session_start() {
        // Same meeting key, no meeting record, different recorded starts
        let sessions = vec![
            session(1, 4, "Qualifying", at(3, 1, 16)),
            session(2, 4, "Race", at(3, 2, 15)),
        ];

        let groups = group_sessions(&sessions, &[]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].sessions[0].session_type, "Race");
        assert_eq!(groups[1].sessions[0].session_type, "Qualifying");
        assert_eq!(groups[0].session_count_label(), "1 session");
    }

    #[test]
    fn test_toggle_only_flips_display_flag() {
        let sessions = vec![
            session(1, 1, "Race", at(3, 2, 15)),
            session(2, 1, "Qualifying", at(3, 2, 15)),
        ];
        let mut groups = group_sessions(&sessions, &[]);
        let before = groups[0].sessions.clone();

        groups[0].toggle();
        assert!(!groups[0].expanded);
        assert_eq!(groups[0].sessions, before);

        groups[0].toggle();
        assert!(groups[0].expanded);
    }

    #[test]
    fn test_build_groups_applies_filter() {
        let sessions = vec![
            session(1, 1, "Practice 1", at(3, 1, 10)),
            session(2, 1, "Race", at(3, 2, 15)),
            session(3, 2, "Race", at(4, 2, 15)),
        ];
        let meetings = vec![meeting(1, "A", at(3, 1, 10)), meeting(2, "B", at(4, 1, 10))];

        let groups = build_groups(&sessions, &meetings, &SessionFilter::parse("RACE"));
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.sessions.len() == 1));
        assert_eq!(groups[0].meeting_name, "B");
    }
}
