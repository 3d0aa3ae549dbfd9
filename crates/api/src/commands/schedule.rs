//! Schedule screen commands

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::info;
use watchbill_core::{build_schedule_view, ScheduleView};
use watchbill_domain::RosterSnapshot;

use crate::utils::logging::log_command_execution;
use crate::AppContext;

/// Everything the schedule screen needs for one render
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleScreen {
    pub view: ScheduleView,
    /// Calendar whose event list is unfolded, revalidated against the
    /// current view so a vanished calendar cannot stay expanded.
    pub expanded_calendar: Option<String>,
    /// True while a fetch cycle runs behind the served data.
    pub refreshing: bool,
    /// Human-readable failure of the last settled cycle, if any.
    pub error: Option<String>,
}

/// Build the schedule screen for `category`
///
/// Serves cached data immediately; a stale or missing roster triggers a
/// background refresh whose completion bumps the roster revision.
pub async fn schedule_screen(
    ctx: &Arc<AppContext>,
    category: Option<String>,
    expanded_calendar: Option<String>,
) -> ScheduleScreen {
    let command_name = "schedule::schedule_screen";
    let start = Instant::now();

    info!(command = command_name, ?category, "Building schedule screen");

    let snapshot = ctx.roster.roster(&ctx.timezone).await;
    let view = match snapshot.data.as_deref() {
        Some(roster) => build_schedule_view(roster, category.as_deref()),
        None => build_schedule_view(&RosterSnapshot::placeholder(), category.as_deref()),
    };
    let expanded_calendar =
        expanded_calendar.filter(|uid| view.calendars.iter().any(|calendar| calendar.uid == *uid));
    let error = snapshot.error.as_ref().map(|err| err.description());
    let refreshing = snapshot.is_refreshing();

    log_command_execution(command_name, start.elapsed(), error.is_none());

    ScheduleScreen { view, expanded_calendar, refreshing, error }
}

/// Force a roster refetch, bypassing staleness
///
/// Backs the manual refresh button. Returns false when no roster was
/// requested yet.
pub async fn refresh_schedule(ctx: &Arc<AppContext>) -> bool {
    let command_name = "schedule::refresh_schedule";
    let start = Instant::now();

    let refreshed = ctx.roster.refresh(&ctx.timezone).await;

    log_command_execution(command_name, start.elapsed(), refreshed);
    refreshed
}
