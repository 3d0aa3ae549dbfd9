//! Interval-based roster refresh driver.
//!
//! Revalidates the cached roster on a fixed interval while the application
//! is open, so the schedule screen keeps tracking the backend without user
//! interaction. The driver only triggers refreshes; retry and staleness
//! policy live in the query cache.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use watchbill_infra::scheduling::{RefreshDriver, RefreshDriverConfig};
//!
//! # async fn example(roster: Arc<watchbill_core::RosterService>) -> Result<(), String> {
//! let mut driver = RefreshDriver::new(
//!     roster,
//!     RefreshDriverConfig { interval: Duration::from_secs(60), timezone: "UTC".to_string() },
//! );
//!
//! driver.start().await.map_err(|e| e.to_string())?;
//! // ... application runs ...
//! driver.stop().await.map_err(|e| e.to_string())?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use watchbill_core::RosterService;

use crate::scheduling::error::{DriverError, DriverResult};

/// Type alias for task handle to avoid complexity warnings
type TaskHandle = Arc<Mutex<Option<JoinHandle<()>>>>;

/// Configuration for the refresh driver
#[derive(Debug, Clone)]
pub struct RefreshDriverConfig {
    /// Refresh interval
    pub interval: Duration,
    /// Timezone the roster is kept warm for
    pub timezone: String,
}

impl Default for RefreshDriverConfig {
    fn default() -> Self {
        Self { interval: Duration::from_secs(60), timezone: "UTC".to_string() }
    }
}

/// Periodic roster refresh driver
pub struct RefreshDriver {
    roster: Arc<RosterService>,
    config: RefreshDriverConfig,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
}

impl RefreshDriver {
    /// Create a new refresh driver
    pub fn new(roster: Arc<RosterService>, config: RefreshDriverConfig) -> Self {
        Self {
            roster,
            config,
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the driver
    ///
    /// Spawns a background task that revalidates the roster periodically.
    ///
    /// # Errors
    ///
    /// Returns error if the driver is already running
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> DriverResult<()> {
        if self.is_running() {
            return Err(DriverError::AlreadyRunning);
        }

        info!(
            interval_secs = self.config.interval.as_secs(),
            timezone = %self.config.timezone,
            "Starting refresh driver"
        );

        // Create a new cancellation token (supports restart after stop)
        self.cancellation_token = CancellationToken::new();

        let roster = Arc::clone(&self.roster);
        let config = self.config.clone();
        let cancel = self.cancellation_token.clone();

        let handle = tokio::spawn(async move {
            Self::refresh_loop(roster, config, cancel).await;
        });

        *self.task_handle.lock().await = Some(handle);

        info!("Refresh driver started");
        Ok(())
    }

    /// Stop the driver gracefully
    ///
    /// Cancels the background task and awaits completion.
    ///
    /// # Errors
    ///
    /// Returns error if the driver is not running
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> DriverResult<()> {
        if !self.is_running() {
            return Err(DriverError::NotRunning);
        }

        info!("Stopping refresh driver");

        // Cancel background task
        self.cancellation_token.cancel();

        // Await handle with timeout
        if let Some(handle) = self.task_handle.lock().await.take() {
            let join_timeout = Duration::from_secs(5);
            match tokio::time::timeout(join_timeout, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => return Err(DriverError::TaskJoinFailed(err.to_string())),
                Err(_) => return Err(DriverError::Timeout { seconds: join_timeout.as_secs() }),
            }
        }

        info!("Refresh driver stopped");
        Ok(())
    }

    /// Check if the driver is running
    ///
    /// The driver is considered running if it has an active task handle that
    /// hasn't finished.
    pub fn is_running(&self) -> bool {
        self.task_handle
            .try_lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Background refresh loop
    async fn refresh_loop(
        roster: Arc<RosterService>,
        config: RefreshDriverConfig,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Refresh loop cancelled");
                    break;
                }
                _ = tokio::time::sleep(config.interval) => {
                    if !roster.refresh(&config.timezone).await {
                        debug!("Roster not requested yet; skipping refresh");
                    }
                }
            }
        }
    }
}

/// Ensure the driver is stopped when dropped
impl Drop for RefreshDriver {
    fn drop(&mut self) {
        // Note: Can't check task_handle (async), so check if token is not cancelled
        // This is best-effort cleanup in Drop
        if !self.cancellation_token.is_cancelled() {
            warn!("RefreshDriver dropped while running; cancelling");
            self.cancellation_token.cancel();
        }
    }
}
