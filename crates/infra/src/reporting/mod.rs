//! Error report sinks.

use tracing::error;
use watchbill_common::{ErrorReport, ErrorReporter};

/// Reporter that emits failure notifications as error-level log events.
///
/// The default sink for headless operation; the desktop shell swaps in a
/// reporter that surfaces toasts instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn notify(&self, report: ErrorReport) {
        error!(
            title = %report.title_or_default(),
            message = %report.message,
            "request cycle failed"
        );
    }
}
