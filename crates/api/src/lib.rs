//! # Watchbill App
//!
//! Application layer - screen commands and context wiring.
//!
//! This crate contains:
//! - Screen commands (shell to data layer bridge)
//! - Application context (dependency injection)
//! - The headless entry point
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires up the layered architecture
//! - Exposes ready-to-render payloads for a thin shell

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
