//! Roster query service - core business logic

use std::sync::Arc;

use tracing::debug;
use watchbill_common::query::{QueryCache, QueryKey, QueryObserver, QueryPolicy, QuerySnapshot};
use watchbill_domain::{RosterSnapshot, Settings, WatchbillError};

use super::ports::DynScheduleGateway;

/// Query cache specialized to roster snapshots.
pub type RosterCache = QueryCache<QueryKey, RosterSnapshot, WatchbillError>;

/// Roster query service.
///
/// Wraps the shared query cache with roster keys and the configured fetch
/// policy. While the first fetch for a timezone is in flight, callers get
/// the placeholder snapshot so a screen can render immediately.
pub struct RosterService {
    gateway: DynScheduleGateway,
    cache: RosterCache,
    settings: Settings,
}

impl RosterService {
    /// Create a new roster service.
    pub fn new(gateway: DynScheduleGateway, cache: RosterCache, settings: Settings) -> Self {
        Self { gateway, cache, settings }
    }

    /// Cache key for the roster localized to `timezone`.
    pub fn key(timezone: &str) -> QueryKey {
        QueryKey::new("schedule").with(timezone)
    }

    /// Requests the roster for `timezone` and returns the current snapshot
    /// immediately. Stale data keeps being served while a refresh runs.
    pub async fn roster(&self, timezone: &str) -> QuerySnapshot<RosterSnapshot, WatchbillError> {
        let gateway = Arc::clone(&self.gateway);
        let tz = timezone.to_string();
        let fetch = move || {
            let gateway = Arc::clone(&gateway);
            let tz = tz.clone();
            async move { gateway.fetch_schedule(&tz).await }
        };
        self.cache.request(Self::key(timezone), self.policy(), fetch).await
    }

    /// Requests the roster and waits for the in-flight cycle, if any, to
    /// settle.
    pub async fn roster_settled(
        &self,
        timezone: &str,
    ) -> QuerySnapshot<RosterSnapshot, WatchbillError> {
        self.roster(timezone).await;
        self.cache.settled(&Self::key(timezone)).await
    }

    /// Reads the cached roster without triggering a fetch. Serves the
    /// placeholder until the first fetch lands.
    pub async fn snapshot(&self, timezone: &str) -> Arc<RosterSnapshot> {
        self.cache
            .peek(&Self::key(timezone))
            .await
            .data
            .unwrap_or_else(|| Arc::new(RosterSnapshot::placeholder()))
    }

    /// Starts a background refresh using the retained fetcher. Returns
    /// false if the roster was never requested.
    pub async fn refresh(&self, timezone: &str) -> bool {
        debug!(timezone, "roster refresh requested");
        self.cache.revalidate(&Self::key(timezone)).await
    }

    /// Marks the roster stale so the next request refetches even if the
    /// data is fresh.
    pub async fn invalidate(&self, timezone: &str) {
        self.cache.invalidate(&Self::key(timezone)).await;
    }

    /// Registers interest in the roster. Focus refreshes only consider
    /// observed entries, so the app holds one of these per visible screen.
    pub async fn watch(&self, timezone: &str) -> Option<QueryObserver> {
        self.cache.watch(&Self::key(timezone)).await
    }

    fn policy(&self) -> QueryPolicy<RosterSnapshot> {
        QueryPolicy::new()
            .stale_time(self.settings.stale_time)
            .retry_count(self.settings.retry_count)
            .retry_delay(self.settings.retry_delay)
            .refetch_on_mount(self.settings.refetch_on_mount)
            .refetch_on_focus(self.settings.refetch_on_focus)
            .initial_data(RosterSnapshot::placeholder())
    }
}
