//! Person popover commands

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::info;
use watchbill_common::QueryStatus;
use watchbill_domain::PersonDetail;

use crate::utils::logging::log_command_execution;
use crate::AppContext;

/// Everything the person popover needs for one render
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonPopover {
    /// The card, once fetched. Absent while the first fetch runs or after
    /// an exhausted cycle that never produced data.
    pub detail: Option<PersonDetail>,
    /// True while the first fetch for this person is in flight.
    pub loading: bool,
    /// True when the backend's own feed sync for this person is failing;
    /// the card may be outdated.
    pub feed_stalled: bool,
    /// Human-readable failure of the last settled cycle, if any.
    pub error: Option<String>,
}

/// Build the popover for one person
///
/// Cards are pinned once fetched, so reopening the popover for the same
/// person is served from cache without a request.
pub async fn person_popover(ctx: &Arc<AppContext>, person_uid: i64) -> PersonPopover {
    let command_name = "person::person_popover";
    let start = Instant::now();

    info!(command = command_name, person_uid, "Building person popover");

    let snapshot = ctx.persons.person(person_uid, &ctx.timezone).await;
    let detail = snapshot.data.as_deref().cloned();
    let loading = detail.is_none() && snapshot.status == QueryStatus::Loading;
    let feed_stalled = detail.as_ref().is_some_and(|card| !card.sync);
    let error = snapshot.error.as_ref().map(|err| err.description());

    log_command_execution(command_name, start.elapsed(), error.is_none());

    PersonPopover { detail, loading, feed_stalled, error }
}
