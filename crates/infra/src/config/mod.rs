//! Configuration loading and management
//!
//! This module provides utilities for building application settings from
//! defaults and environment overrides.

pub mod loader;

// Re-export commonly used items
pub use loader::{load_settings, resolve_timezone};
