//! Shared test support.
//!
//! Ships in the library so downstream crates can reuse the same fakes in
//! their own tests.

use std::sync::Mutex;

use crate::query::{ErrorReport, ErrorReporter};

pub use crate::time::MockClock;

/// Reporter that records every notification for later inspection.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    reports: Mutex<Vec<ErrorReport>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far, in arrival order.
    pub fn reports(&self) -> Vec<ErrorReport> {
        self.reports.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl ErrorReporter for CollectingReporter {
    fn notify(&self, report: ErrorReport) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push(report);
        }
    }
}
