//! Configuration loader
//!
//! Builds application settings from defaults plus environment overrides.
//! A `.env` file in the working directory is honored when present, which
//! keeps local development setups out of the shell profile.
//!
//! ## Environment Variables
//! - `WATCHBILL_BASE_URL`: Backend base URL
//! - `WATCHBILL_TIMEZONE`: IANA timezone for schedule rendering
//! - `WATCHBILL_REQUEST_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `WATCHBILL_STALE_TIME_SECS`: Seconds before cached data counts as stale
//! - `WATCHBILL_RETRY_COUNT`: Retries after a failed fetch attempt
//! - `WATCHBILL_RETRY_DELAY_MS`: Delay between retries in milliseconds
//! - `WATCHBILL_REFETCH_ON_MOUNT`: Refetch stale data when a screen opens (true/false)
//! - `WATCHBILL_REFETCH_ON_FOCUS`: Refetch stale data on window focus (true/false)
//! - `WATCHBILL_REFRESH_INTERVAL_SECS`: Background roster refresh interval in seconds
//!
//! Unset variables fall back to [`Settings::default`].

use std::time::Duration;

use watchbill_domain::{Result, Settings, WatchbillError};

/// Load settings from the environment
///
/// Starts from [`Settings::default`] and applies any `WATCHBILL_*`
/// overrides found in the environment (after loading `.env` if present).
///
/// # Errors
/// Returns `WatchbillError::Config` if an override is present but cannot
/// be parsed.
pub fn load_settings() -> Result<Settings> {
    // Absence of a .env file is the normal case outside development
    dotenvy::dotenv().ok();

    let defaults = Settings::default();

    let settings = Settings {
        base_url: std::env::var("WATCHBILL_BASE_URL").unwrap_or(defaults.base_url),
        timezone: std::env::var("WATCHBILL_TIMEZONE").ok().or(defaults.timezone),
        request_timeout: env_secs("WATCHBILL_REQUEST_TIMEOUT_SECS", defaults.request_timeout)?,
        stale_time: env_secs("WATCHBILL_STALE_TIME_SECS", defaults.stale_time)?,
        retry_count: env_u32("WATCHBILL_RETRY_COUNT", defaults.retry_count)?,
        retry_delay: env_millis("WATCHBILL_RETRY_DELAY_MS", defaults.retry_delay)?,
        refetch_on_mount: env_bool("WATCHBILL_REFETCH_ON_MOUNT", defaults.refetch_on_mount),
        refetch_on_focus: env_bool("WATCHBILL_REFETCH_ON_FOCUS", defaults.refetch_on_focus),
        refresh_interval: env_secs("WATCHBILL_REFRESH_INTERVAL_SECS", defaults.refresh_interval)?,
    };

    tracing::info!(base_url = %settings.base_url, "Configuration loaded");
    Ok(settings)
}

/// Resolve the timezone the roster should be rendered in
///
/// Validates `configured` against the IANA database; unknown names and
/// `None` both resolve to UTC so a typo in the environment cannot take
/// the schedule screen down.
pub fn resolve_timezone(configured: Option<&str>) -> String {
    match configured {
        None => "UTC".to_string(),
        Some(name) => match name.parse::<chrono_tz::Tz>() {
            Ok(tz) => tz.name().to_string(),
            Err(_) => {
                tracing::warn!(timezone = name, "Unknown timezone, falling back to UTC");
                "UTC".to_string()
            }
        },
    }
}

/// Parse an optional duration-in-seconds environment variable
///
/// # Errors
/// Returns `WatchbillError::Config` if the variable is set but not a
/// valid integer.
fn env_secs(key: &str, default: Duration) -> Result<Duration> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| WatchbillError::Config(format!("Invalid {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}

/// Parse an optional duration-in-milliseconds environment variable
fn env_millis(key: &str, default: Duration) -> Result<Duration> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| WatchbillError::Config(format!("Invalid {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}

/// Parse an optional integer environment variable
fn env_u32(key: &str, default: u32) -> Result<u32> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<u32>()
            .map_err(|e| WatchbillError::Config(format!("Invalid {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
///
/// # Arguments
/// * `key` - Environment variable name
/// * `default` - Default value if variable is not set
///
/// # Returns
/// The parsed boolean value, or `default` if not set.
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
