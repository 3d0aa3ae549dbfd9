//! # Watchbill Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The HTTP client for the duty-board backend
//! - Wire-format normalization (snake_case payloads to camelCase)
//! - Configuration loading from the environment
//! - The periodic roster refresh driver
//! - The production error report sink
//!
//! ## Architecture
//! - Implements traits defined in `watchbill-core`
//! - Depends on `watchbill-common`, `watchbill-domain`, `watchbill-core`
//! - Contains all "impure" code (network, environment, timers)

pub mod api;
pub mod config;
pub mod reporting;
pub mod scheduling;
pub mod wire;

// Re-export commonly used items
pub use api::{ScheduleClient, ScheduleClientConfig};
pub use config::{load_settings, resolve_timezone};
pub use reporting::TracingReporter;
pub use scheduling::{DriverError, DriverResult, RefreshDriver, RefreshDriverConfig};
pub use wire::camelize_keys;
