//! Port interfaces for the duty-board backend
//!
//! These traits define the boundary between core query logic
//! and the HTTP infrastructure.

use std::sync::Arc;

use async_trait::async_trait;
use watchbill_domain::{PersonDetail, Result, RosterSnapshot};

/// Read access to the duty-board backend.
#[async_trait]
pub trait ScheduleGateway: Send + Sync {
    /// Fetch the full roster snapshot with events localized to `timezone`.
    async fn fetch_schedule(&self, timezone: &str) -> Result<RosterSnapshot>;

    /// Fetch one person's detail card with timestamps localized to
    /// `timezone`.
    async fn fetch_person(&self, person_uid: i64, timezone: &str) -> Result<PersonDetail>;
}

/// Shared gateway handle used by the query services.
pub type DynScheduleGateway = Arc<dyn ScheduleGateway>;
