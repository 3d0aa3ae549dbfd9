//! Background refresh scheduling
//!
//! Keeps the roster warm while the application is open: a driver task
//! revalidates the cached roster on a fixed interval so the screen stays
//! close to the backend without any user interaction.
//!
//! The driver follows the runtime rules used across the crate:
//! - Explicit lifecycle management (start/stop)
//! - Join handles for spawned tasks
//! - Cancellation token support
//! - Timeout wrapping on shutdown

pub mod error;
pub mod refresh_driver;

pub use error::{DriverError, DriverResult};
pub use refresh_driver::{RefreshDriver, RefreshDriverConfig};
