//! Person detail query service - core business logic

use std::sync::Arc;

use watchbill_common::query::{QueryCache, QueryKey, QueryPolicy, QuerySnapshot};
use watchbill_domain::{PersonDetail, Settings, WatchbillError};

use crate::schedule::ports::DynScheduleGateway;

/// Query cache specialized to person detail cards.
pub type PersonCache = QueryCache<QueryKey, PersonDetail, WatchbillError>;

/// Person detail query service.
///
/// Details are pinned once fetched: a person card does not change within
/// a session, so every open of the same popover is served from cache.
pub struct PersonDetailService {
    gateway: DynScheduleGateway,
    cache: PersonCache,
    settings: Settings,
}

impl PersonDetailService {
    /// Create a new person detail service.
    pub fn new(gateway: DynScheduleGateway, cache: PersonCache, settings: Settings) -> Self {
        Self { gateway, cache, settings }
    }

    /// Cache key for one person's card localized to `timezone`.
    pub fn key(person_uid: i64, timezone: &str) -> QueryKey {
        QueryKey::new("person").with(person_uid).with(timezone)
    }

    /// Requests the detail card and returns the current snapshot
    /// immediately.
    pub async fn person(
        &self,
        person_uid: i64,
        timezone: &str,
    ) -> QuerySnapshot<PersonDetail, WatchbillError> {
        let gateway = Arc::clone(&self.gateway);
        let tz = timezone.to_string();
        let fetch = move || {
            let gateway = Arc::clone(&gateway);
            let tz = tz.clone();
            async move { gateway.fetch_person(person_uid, &tz).await }
        };
        self.cache.request(Self::key(person_uid, timezone), self.policy(), fetch).await
    }

    /// Requests the detail card and waits for the in-flight cycle, if
    /// any, to settle.
    pub async fn person_settled(
        &self,
        person_uid: i64,
        timezone: &str,
    ) -> QuerySnapshot<PersonDetail, WatchbillError> {
        self.person(person_uid, timezone).await;
        self.cache.settled(&Self::key(person_uid, timezone)).await
    }

    fn policy(&self) -> QueryPolicy<PersonDetail> {
        QueryPolicy::pinned()
            .retry_count(self.settings.retry_count)
            .retry_delay(self.settings.retry_delay)
    }
}
