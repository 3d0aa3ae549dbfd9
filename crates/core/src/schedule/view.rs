//! Schedule view assembly - pure mapping from a roster snapshot to the
//! screen model for one category tab.

use serde::Serialize;
use watchbill_domain::{CalendarEntry, DisplayConfig, OnCallEvent, RosterSnapshot};

/// Resolved reference to the person assigned to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PersonRef {
    /// The snapshot's person table knows this uid.
    Known { uid: i64, name: String },
    /// The event references a uid missing from the person table. This is
    /// a display state, not an error; the uid stays available for
    /// diagnostics.
    Unknown { uid: i64 },
}

impl PersonRef {
    /// Label rendered for the assignee.
    pub fn display_name(&self) -> String {
        match self {
            Self::Known { name, .. } => name.clone(),
            Self::Unknown { .. } => "Unknown".to_string(),
        }
    }

    pub fn uid(&self) -> i64 {
        match self {
            Self::Known { uid, .. } | Self::Unknown { uid } => *uid,
        }
    }
}

/// One on-call assignment prepared for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub start: String,
    pub end: String,
    pub person: PersonRef,
}

/// One calendar prepared for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarView {
    pub uid: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub order: i64,
    pub last_update: String,
    pub error_msg: String,
    pub sync: bool,
    /// Who holds the duty right now: the first event the backend served.
    pub current: Option<EventView>,
    /// Later assignments, soonest first.
    pub upcoming: Vec<EventView>,
}

impl CalendarView {
    /// True when the backend's feed for this calendar stopped syncing;
    /// events may be outdated but are still shown. Advisory only.
    pub fn feed_stalled(&self) -> bool {
        !self.sync
    }
}

/// The schedule screen for one category tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    pub config: DisplayConfig,
    /// The category this view was assembled for. `None` when the config
    /// lists no categories; no calendars render without one.
    pub category: Option<String>,
    pub calendars: Vec<CalendarView>,
}

/// Assembles the screen model for `category` from a roster snapshot.
///
/// `None` or an empty string selects the first configured category; a
/// config without categories leaves no effective category and renders no
/// calendars. Calendars are filtered to the category in the order the
/// feed served them; `order` is an upstream render hint and passes
/// through untouched. A category with no calendars yields an empty list,
/// including categories the config does not know.
pub fn build_schedule_view(snapshot: &RosterSnapshot, category: Option<&str>) -> ScheduleView {
    let category = category
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .or_else(|| snapshot.config.categories.first().cloned());

    let calendars = match category.as_deref() {
        Some(active) => snapshot
            .calendars
            .iter()
            .filter(|entry| entry.category == active)
            .map(|entry| calendar_view(snapshot, entry))
            .collect(),
        None => Vec::new(),
    };

    ScheduleView { config: snapshot.config.clone(), category, calendars }
}

fn calendar_view(snapshot: &RosterSnapshot, entry: &CalendarEntry) -> CalendarView {
    let mut events = entry.events.iter().map(|event| event_view(snapshot, event));
    let current = events.next();
    let upcoming = events.collect();

    CalendarView {
        uid: entry.uid.clone(),
        name: entry.name.clone(),
        description: entry.description.clone(),
        category: entry.category.clone(),
        order: entry.order,
        last_update: entry.last_update.clone(),
        error_msg: entry.error_msg.clone(),
        sync: entry.sync,
        current,
        upcoming,
    }
}

fn event_view(snapshot: &RosterSnapshot, event: &OnCallEvent) -> EventView {
    let person = match snapshot.person(event.person_uid) {
        Some(summary) => PersonRef::Known { uid: summary.uid, name: summary.display_name() },
        None => PersonRef::Unknown { uid: event.person_uid },
    };
    EventView { start: event.start_event.clone(), end: event.end_event.clone(), person }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use watchbill_domain::PersonSummary;

    use super::*;

    fn config(categories: &[&str]) -> DisplayConfig {
        DisplayConfig {
            timezone: "UTC".to_string(),
            text_color: "#000".to_string(),
            background_color: "#fff".to_string(),
            categories: categories.iter().map(|c| (*c).to_string()).collect(),
            git_repository_url: None,
            enable_admin_button: false,
            announcement_text_color: "#000".to_string(),
            announcement_background_color: "#fff".to_string(),
            announcements: Vec::new(),
            footer_html: None,
        }
    }

    fn calendar(uid: &str, category: &str, order: i64, events: Vec<OnCallEvent>) -> CalendarEntry {
        CalendarEntry {
            uid: uid.to_string(),
            name: format!("{uid} name"),
            description: String::new(),
            category: category.to_string(),
            order,
            last_update: "2024-05-01 10:00:00 UTC".to_string(),
            error_msg: String::new(),
            sync: true,
            events,
        }
    }

    fn event(person_uid: i64) -> OnCallEvent {
        OnCallEvent {
            start_event: "2024-05-01 08:00:00 UTC".to_string(),
            end_event: "2024-05-02 08:00:00 UTC".to_string(),
            person_uid,
        }
    }

    fn snapshot() -> RosterSnapshot {
        let mut persons = HashMap::new();
        persons.insert(
            "42".to_string(),
            PersonSummary {
                uid: 42,
                username: Some("al".to_string()),
                email: Some("al@example.com".to_string()),
            },
        );
        RosterSnapshot {
            config: config(&["Infrastructure", "Support"]),
            calendars: vec![
                calendar("second", "Infrastructure", 2, vec![event(42), event(7)]),
                calendar("first", "Infrastructure", 1, vec![event(42)]),
                calendar("helpdesk", "Support", 1, Vec::new()),
            ],
            persons,
        }
    }

    /// Validates `build_schedule_view` behavior for the default category
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `None` and an empty string select the first configured
    ///   category.
    /// - Confirms calendars keep the order the feed served them even when
    ///   their `order` hints disagree.
    #[test]
    fn test_default_category_is_first_configured() {
        let view = build_schedule_view(&snapshot(), None);
        assert_eq!(view.category.as_deref(), Some("Infrastructure"));
        let uids: Vec<&str> = view.calendars.iter().map(|c| c.uid.as_str()).collect();
        assert_eq!(uids, vec!["second", "first"]);

        let blank = build_schedule_view(&snapshot(), Some(""));
        assert_eq!(blank.category.as_deref(), Some("Infrastructure"));
    }

    /// Validates `build_schedule_view` behavior when the config lists no
    /// categories.
    ///
    /// Assertions:
    /// - Confirms there is no effective category and nothing renders, even
    ///   for a calendar whose own category is the empty string.
    /// - Confirms an explicit blank selection changes neither.
    #[test]
    fn test_no_configured_categories_renders_no_calendars() {
        let mut roster = snapshot();
        roster.config.categories = Vec::new();
        roster.calendars.push(calendar("orphan", "", 1, vec![event(42)]));

        let view = build_schedule_view(&roster, None);
        assert_eq!(view.category, None);
        assert!(view.calendars.is_empty());

        let blank = build_schedule_view(&roster, Some(""));
        assert_eq!(blank.category, None);
        assert!(blank.calendars.is_empty());
    }

    /// Validates `build_schedule_view` behavior for the explicit category
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms only calendars of the requested category are included.
    /// - Confirms an unknown category yields an empty calendar list.
    #[test]
    fn test_category_filter_and_unknown_category() {
        let view = build_schedule_view(&snapshot(), Some("Support"));
        assert_eq!(view.calendars.len(), 1);
        assert_eq!(view.calendars[0].uid, "helpdesk");

        let unknown = build_schedule_view(&snapshot(), Some("Nonexistent"));
        assert_eq!(unknown.category.as_deref(), Some("Nonexistent"));
        assert!(unknown.calendars.is_empty());
    }

    /// Validates `build_schedule_view` behavior for the current/upcoming
    /// split.
    ///
    /// Assertions:
    /// - Confirms the first served event becomes the current assignment.
    /// - Confirms remaining events land in upcoming, order preserved.
    /// - Confirms a calendar without events has no current assignment.
    #[test]
    fn test_first_event_is_current_rest_upcoming() {
        let view = build_schedule_view(&snapshot(), None);
        let busy = &view.calendars[0]; // "second", two events
        let current = busy.current.as_ref().unwrap();
        assert_eq!(current.person.uid(), 42);
        assert_eq!(busy.upcoming.len(), 1);
        assert_eq!(busy.upcoming[0].person.uid(), 7);

        let empty = build_schedule_view(&snapshot(), Some("Support"));
        assert!(empty.calendars[0].current.is_none());
        assert!(empty.calendars[0].upcoming.is_empty());
    }

    /// Validates `PersonRef` behavior for the lookup miss scenario.
    ///
    /// Assertions:
    /// - Confirms a known uid resolves to the person's display name.
    /// - Confirms a missing uid renders the placeholder label while the
    ///   uid stays available, not an error.
    #[test]
    fn test_unknown_person_renders_placeholder() {
        let view = build_schedule_view(&snapshot(), None);
        let busy = &view.calendars[0];
        assert_eq!(busy.current.as_ref().unwrap().person.display_name(), "al");
        let upcoming = &busy.upcoming[0].person;
        assert_eq!(upcoming, &PersonRef::Unknown { uid: 7 });
        assert_eq!(upcoming.display_name(), "Unknown");
        assert_eq!(upcoming.uid(), 7);
    }

    /// Validates `CalendarView::feed_stalled` behavior for the sync flag.
    ///
    /// Assertions:
    /// - Confirms a calendar with `sync == false` reports a stalled feed.
    #[test]
    fn test_feed_stalled_reflects_sync_flag() {
        let mut roster = snapshot();
        roster.calendars[0].sync = false;
        roster.calendars[0].error_msg = "upstream 503".to_string();
        let view = build_schedule_view(&roster, None);
        let stalled = view.calendars.iter().find(|c| c.uid == "second").unwrap();
        assert!(stalled.feed_stalled());
        assert_eq!(stalled.error_msg, "upstream 503");
        let healthy = view.calendars.iter().find(|c| c.uid == "first").unwrap();
        assert!(!healthy.feed_stalled());
    }

    /// Validates `build_schedule_view` behavior for the placeholder
    /// snapshot.
    ///
    /// Assertions:
    /// - Confirms the loading placeholder renders its single category and
    ///   no calendars.
    #[test]
    fn test_placeholder_snapshot_builds_loading_view() {
        let view = build_schedule_view(&RosterSnapshot::placeholder(), None);
        assert_eq!(view.category.as_deref(), Some("Loading.."));
        assert!(view.calendars.is_empty());
    }

    /// Validates the serialized shape of the view model.
    ///
    /// Assertions:
    /// - Confirms keys are camelCase.
    /// - Confirms the person reference is tagged by kind.
    #[test]
    fn test_view_serializes_camel_case_with_tagged_person() {
        let view = build_schedule_view(&snapshot(), None);
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["category"], "Infrastructure");
        assert!(value["config"]["enableAdminButton"].is_boolean());
        let current = &value["calendars"][0]["current"];
        assert_eq!(current["person"]["kind"], "known");
        assert_eq!(current["person"]["name"], "al");
        assert_eq!(value["calendars"][0]["lastUpdate"], "2024-05-01 10:00:00 UTC");
    }
}
