//! Roster snapshot types: display configuration, calendars, and the
//! person lookup table that accompanies them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Display configuration the backend sends alongside every roster snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayConfig {
    pub timezone: String,
    pub text_color: String,
    pub background_color: String,
    /// Category names in display order; the first one is the default tab.
    pub categories: Vec<String>,
    pub git_repository_url: Option<String>,
    pub enable_admin_button: bool,
    pub announcement_text_color: String,
    pub announcement_background_color: String,
    pub announcements: Vec<String>,
    pub footer_html: Option<String>,
}

/// One on-call assignment inside a calendar.
///
/// Timestamps are preformatted by the backend in the requested timezone
/// (`YYYY-MM-DD HH:MM:SS TZ`), so they stay opaque strings here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnCallEvent {
    pub start_event: String,
    pub end_event: String,
    pub person_uid: i64,
}

/// One duty calendar with its upcoming events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub uid: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub order: i64,
    pub last_update: String,
    pub error_msg: String,
    /// False when the backend's feed synchronization for this calendar is
    /// failing; events may be outdated but are still served.
    pub sync: bool,
    /// Ongoing and future events, soonest first. The backend filters out
    /// events that already ended.
    pub events: Vec<OnCallEvent>,
}

/// The subset of person fields embedded in a roster snapshot, enough to
/// render an assignee without a second request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummary {
    pub uid: i64,
    pub username: Option<String>,
    pub email: Option<String>,
}

impl PersonSummary {
    /// Preferred label for display: username, else email, else the
    /// "unknown" placeholder.
    pub fn display_name(&self) -> String {
        self.username
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Everything one `/schedule` response carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSnapshot {
    pub config: DisplayConfig,
    pub calendars: Vec<CalendarEntry>,
    /// Keyed by the person uid rendered as a string (JSON object keys are
    /// always strings on the wire).
    pub persons: HashMap<String, PersonSummary>,
}

impl RosterSnapshot {
    /// Looks up a person referenced by an event.
    pub fn person(&self, uid: i64) -> Option<&PersonSummary> {
        self.persons.get(&uid.to_string())
    }

    /// Synchronous stand-in served while the first fetch is still in
    /// flight: a single "Loading.." category and nothing else.
    pub fn placeholder() -> Self {
        Self {
            config: DisplayConfig {
                timezone: String::new(),
                text_color: String::new(),
                background_color: String::new(),
                categories: vec!["Loading..".to_string()],
                git_repository_url: None,
                enable_admin_button: false,
                announcement_text_color: String::new(),
                announcement_background_color: String::new(),
                announcements: Vec::new(),
                footer_html: None,
            },
            calendars: Vec::new(),
            persons: HashMap::new(),
        }
    }
}
