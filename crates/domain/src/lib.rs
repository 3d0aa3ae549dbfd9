//! # Watchbill Domain
//!
//! Business domain types and models for Watchbill.
//!
//! This crate contains:
//! - Roster and person data types as served by the duty-board backend
//! - Domain error types and Result definitions
//! - Settings structures
//!
//! ## Architecture
//! - No dependencies on other Watchbill crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
