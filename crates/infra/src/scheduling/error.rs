//! Refresh driver error types

use thiserror::Error;
use watchbill_domain::WatchbillError;

/// Driver-specific errors
#[derive(Debug, Error)]
pub enum DriverError {
    /// Driver is already running
    #[error("Refresh driver already running")]
    AlreadyRunning,

    /// Driver is not running
    #[error("Refresh driver not running")]
    NotRunning,

    /// Operation timed out
    #[error("Operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Task join failed
    #[error("Task join failed: {0}")]
    TaskJoinFailed(String),
}

impl From<DriverError> for WatchbillError {
    fn from(err: DriverError) -> Self {
        WatchbillError::Internal(err.to_string())
    }
}

/// Convenience type alias for driver operations
pub type DriverResult<T> = Result<T, DriverError>;
