//! Keyed fetch-and-cache engine with staleness, retries, and reporting.
//!
//! The cache holds one independent state machine per [`QueryKey`]-like key:
//!
//! ```text
//! Empty ──request──▶ Loading ──ok──▶ Success ──stale request──▶ Loading
//!                       │                                          │
//!                       └──retries exhausted──▶ Error ──request────┘
//! ```
//!
//! `Success` and `Error` are re-entrant: a background refresh keeps serving
//! the last good data while it runs, and a failed refresh keeps the data
//! too. Completions are applied in issuance order, so a slow response from
//! a superseded fetch can never clobber newer state.

mod cache;
mod key;
mod policy;
mod report;
mod snapshot;

pub use cache::{QueryCache, QueryObserver};
pub use key::QueryKey;
pub use policy::QueryPolicy;
pub use report::{ErrorReport, ErrorReporter, MAX_REPORT_MESSAGE_LEN};
pub use snapshot::{QuerySnapshot, QueryStatus};
