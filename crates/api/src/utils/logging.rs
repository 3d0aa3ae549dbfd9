//! Logging setup and command execution logging

use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber
///
/// Reads the filter from `WATCHBILL_LOG`, defaulting to `info`. Safe to
/// call more than once; only the first call installs a subscriber.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("WATCHBILL_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"schedule::schedule_screen"`).
/// * `elapsed` - Duration the command execution took.
/// * `success` - Whether the command completed without a data-layer error.
///
/// The helper keeps the command wrappers concise and the log shape
/// consistent across commands.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}
