//! Per-request cache policy.

use std::time::Duration;

/// How one key's fetch cycle behaves: when cached data counts as stale,
/// how failures are retried, and what to serve before the first response.
///
/// The defaults are the duty board's long-standing tuning: five-minute
/// staleness, one retry after 500 ms, revalidate on mount but not on
/// focus.
#[derive(Debug, Clone)]
pub struct QueryPolicy<V> {
    /// Age at which cached data becomes eligible for refresh.
    pub stale_time: Duration,
    /// Retries after the initial attempt of one fetch cycle.
    pub retry_count: u32,
    /// Fixed pause between attempts.
    pub retry_delay: Duration,
    /// Whether a request for a stale key triggers a background refresh.
    pub refetch_on_mount: bool,
    /// Whether a focus event refreshes this key when stale and observed.
    pub refetch_on_focus: bool,
    /// Data served synchronously before the first response. Treated as
    /// already stale, so the first fetch still fires.
    pub initial_data: Option<V>,
}

impl<V> Default for QueryPolicy<V> {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(5 * 60),
            retry_count: 1,
            retry_delay: Duration::from_millis(500),
            refetch_on_mount: true,
            refetch_on_focus: false,
            initial_data: None,
        }
    }
}

impl<V> QueryPolicy<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy for data that stays valid for the whole session: never goes
    /// stale, so no background refresh pressure builds up.
    pub fn pinned() -> Self {
        Self { stale_time: Duration::MAX, ..Self::default() }
    }

    #[must_use]
    pub fn stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    #[must_use]
    pub fn retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    #[must_use]
    pub fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    #[must_use]
    pub fn refetch_on_mount(mut self, refetch_on_mount: bool) -> Self {
        self.refetch_on_mount = refetch_on_mount;
        self
    }

    #[must_use]
    pub fn refetch_on_focus(mut self, refetch_on_focus: bool) -> Self {
        self.refetch_on_focus = refetch_on_focus;
        self
    }

    #[must_use]
    pub fn initial_data(mut self, initial_data: V) -> Self {
        self.initial_data = Some(initial_data);
        self
    }
}
