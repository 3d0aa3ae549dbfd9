//! Shared test helpers for `watchbill-core` integration tests.
//!
//! Provides an in-memory duty-board backend and roster fixtures so the
//! service tests can focus on caching behaviour instead of boilerplate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use watchbill_core::ScheduleGateway;
use watchbill_domain::{
    CalendarEntry, DisplayConfig, OnCallEvent, PersonDetail, PersonSummary,
    Result as DomainResult, RosterSnapshot, WatchbillError,
};

/// In-memory mock for `ScheduleGateway`.
///
/// Serves a fixed roster per timezone and counts calls per endpoint.
/// Built with [`MockScheduleGateway::failing`] it refuses every fetch
/// with a transport error instead.
#[derive(Default)]
pub struct MockScheduleGateway {
    schedule_calls: AtomicUsize,
    person_calls: AtomicUsize,
    fail: bool,
}

impl MockScheduleGateway {
    /// Create a mock that answers every fetch with fixture data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose fetches always fail with a transport error.
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    /// Number of `/schedule` fetches served so far.
    pub fn schedule_calls(&self) -> usize {
        self.schedule_calls.load(Ordering::SeqCst)
    }

    /// Number of `/person` fetches served so far.
    pub fn person_calls(&self) -> usize {
        self.person_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScheduleGateway for MockScheduleGateway {
    async fn fetch_schedule(&self, timezone: &str) -> DomainResult<RosterSnapshot> {
        self.schedule_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(WatchbillError::Transport("connection refused".to_string()));
        }
        Ok(sample_roster(timezone))
    }

    async fn fetch_person(&self, person_uid: i64, _timezone: &str) -> DomainResult<PersonDetail> {
        self.person_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(WatchbillError::Transport("connection refused".to_string()));
        }
        Ok(sample_person(person_uid))
    }
}

/// Roster fixture: one category, one calendar, one known assignee. The
/// requested timezone is echoed in the display config.
pub fn sample_roster(timezone: &str) -> RosterSnapshot {
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
        config: DisplayConfig {
            timezone: timezone.to_string(),
            text_color: "#000000".to_string(),
            background_color: "#ffffff".to_string(),
            categories: vec!["Infrastructure".to_string()],
            git_repository_url: None,
            enable_admin_button: false,
            announcement_text_color: "#000000".to_string(),
            announcement_background_color: "#ffffff".to_string(),
            announcements: Vec::new(),
            footer_html: None,
        },
        calendars: vec![CalendarEntry {
            uid: "data-platform".to_string(),
            name: "Data Platform".to_string(),
            description: "Primary on-call".to_string(),
            category: "Infrastructure".to_string(),
            order: 1,
            last_update: "2024-05-01 10:00:00 UTC".to_string(),
            error_msg: String::new(),
            sync: true,
            events: vec![OnCallEvent {
                start_event: "2024-05-01 08:00:00 UTC".to_string(),
                end_event: "2024-05-02 08:00:00 UTC".to_string(),
                person_uid: 42,
            }],
        }],
        persons,
    }
}

/// Person detail fixture for the given uid.
pub fn sample_person(uid: i64) -> PersonDetail {
    PersonDetail {
        uid: uid.to_string(),
        username: Some(format!("user{uid}")),
        email: Some(format!("user{uid}@example.com")),
        img_filename: None,
        img_width: None,
        img_height: None,
        extra_attributes: Vec::new(),
        last_update: "2024-05-01 10:00:00 UTC".to_string(),
        error_msg: String::new(),
        sync: true,
    }
}
