//! Application context - dependency injection container

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};
use watchbill_common::QueryObserver;
use watchbill_core::{DynScheduleGateway, PersonCache, PersonDetailService, RosterCache, RosterService};
use watchbill_domain::{Result, Settings};
use watchbill_infra::scheduling::DriverError;
use watchbill_infra::{
    load_settings, resolve_timezone, RefreshDriver, RefreshDriverConfig, ScheduleClient,
    TracingReporter,
};

/// Application context - holds all services and dependencies
///
/// Construction wires the full stack: HTTP client, query caches, services,
/// and the background refresh driver. The roster for the resolved timezone
/// is requested immediately so the schedule screen has data (or at least
/// the placeholder) by the time it first renders.
pub struct AppContext {
    pub settings: Settings,
    /// Timezone every request is localized to, resolved once at startup.
    pub timezone: String,
    pub roster: Arc<RosterService>,
    pub persons: Arc<PersonDetailService>,

    // Cache handles kept for focus refresh, sweeping, and shutdown
    roster_cache: RosterCache,
    person_cache: PersonCache,

    refresh_driver: Mutex<RefreshDriver>,
    // Held for the lifetime of the app so the roster entry stays observed
    roster_observer: Mutex<Option<QueryObserver>>,
}

impl AppContext {
    /// Create a new application context from environment settings
    pub async fn new() -> Result<Self> {
        Self::with_settings(load_settings()?).await
    }

    /// Create a new application context with explicit settings
    ///
    /// This entry point is primarily for tests, which point `base_url` at a
    /// mock backend.
    pub async fn with_settings(settings: Settings) -> Result<Self> {
        let timezone = resolve_timezone(settings.timezone.as_deref());
        info!(base_url = %settings.base_url, timezone = %timezone, "Initializing application context");

        let reporter = Arc::new(TracingReporter);
        let roster_cache = RosterCache::new(reporter.clone());
        let person_cache = PersonCache::new(reporter);

        let gateway: DynScheduleGateway = Arc::new(ScheduleClient::from_settings(&settings)?);
        let roster = Arc::new(RosterService::new(
            Arc::clone(&gateway),
            roster_cache.clone(),
            settings.clone(),
        ));
        let persons =
            Arc::new(PersonDetailService::new(gateway, person_cache.clone(), settings.clone()));

        // Prime the roster; the call returns the placeholder immediately
        // while the first fetch runs in the background
        roster.roster(&timezone).await;
        let roster_observer = roster.watch(&timezone).await;

        let mut driver = RefreshDriver::new(
            Arc::clone(&roster),
            RefreshDriverConfig { interval: settings.refresh_interval, timezone: timezone.clone() },
        );
        driver.start().await?;

        Ok(Self {
            settings,
            timezone,
            roster,
            persons,
            roster_cache,
            person_cache,
            refresh_driver: Mutex::new(driver),
            roster_observer: Mutex::new(roster_observer),
        })
    }

    /// Hook for the window-focus event
    ///
    /// Gives each cache the chance to revalidate stale observed entries.
    /// Returns how many refreshes were started.
    pub async fn focus(&self) -> usize {
        let refreshed = self.roster_cache.on_focus().await + self.person_cache.on_focus().await;
        if refreshed > 0 {
            debug!(refreshed, "Focus triggered revalidation");
        }
        refreshed
    }

    /// Evict settled stale entries nobody is observing
    ///
    /// Intended for the window-blur event; returns how many entries were
    /// dropped. The roster entry survives because the context observes it.
    pub async fn sweep(&self) -> usize {
        self.roster_cache.sweep().await + self.person_cache.sweep().await
    }

    /// Shutdown the application context gracefully
    ///
    /// Stops the refresh driver, releases the long-lived roster interest,
    /// and shuts both caches down so no fetch outlives the context. Safe to
    /// call more than once.
    pub async fn shutdown(&self) -> Result<()> {
        info!("Shutting down application context");

        let stop_result = {
            let mut driver = self.refresh_driver.lock().await;
            match driver.stop().await {
                Err(DriverError::NotRunning) => {
                    debug!("Refresh driver already stopped");
                    Ok(())
                }
                other => other,
            }
        };

        self.roster_observer.lock().await.take();

        self.roster_cache.shutdown().await;
        self.person_cache.shutdown().await;

        stop_result.map_err(Into::into)
    }
}
