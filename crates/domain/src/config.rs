//! Application settings.
//!
//! Pure data: the environment loader lives in the infra crate.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for the client data layer.
///
/// The cache-policy fields mirror what the duty board has always shipped
/// with: served data goes stale after five minutes, a failed fetch is
/// retried once after 500 ms, and revalidation happens on mount but not on
/// focus unless opted in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the duty-board backend, without a trailing slash.
    pub base_url: String,
    /// Preferred IANA timezone for localized timestamps. `None` asks the
    /// loader to fall back to UTC.
    pub timezone: Option<String>,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// Age at which cached data becomes eligible for background refresh.
    pub stale_time: Duration,
    /// Retries after the initial attempt of one fetch cycle.
    pub retry_count: u32,
    /// Fixed pause between attempts.
    pub retry_delay: Duration,
    /// Refetch stale data when a consumer re-requests it.
    pub refetch_on_mount: bool,
    /// Refetch stale data when the application regains focus.
    pub refetch_on_focus: bool,
    /// Tick period of the background refresh driver.
    pub refresh_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timezone: None,
            request_timeout: Duration::from_secs(30),
            stale_time: Duration::from_secs(5 * 60),
            retry_count: 1,
            retry_delay: Duration::from_millis(500),
            refetch_on_mount: true,
            refetch_on_focus: false,
            refresh_interval: Duration::from_secs(60),
        }
    }
}
