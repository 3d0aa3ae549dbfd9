//! Shared async building blocks for the Watchbill crates.
//!
//! The centerpiece is [`query::QueryCache`], a keyed fetch-and-cache engine
//! with staleness tracking, request de-duplication, bounded retries, and
//! fire-and-forget error reporting. [`time`] supplies the clock abstraction
//! that keeps staleness deterministic in tests, and [`testing`] holds the
//! matching test doubles.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod query;
pub mod testing;
pub mod time;

// Re-export commonly used types and traits for convenience
pub use query::{
    ErrorReport, ErrorReporter, QueryCache, QueryKey, QueryObserver, QueryPolicy, QuerySnapshot,
    QueryStatus, MAX_REPORT_MESSAGE_LEN,
};
pub use time::{Clock, MockClock, SystemClock};
