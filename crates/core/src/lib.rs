//! # Watchbill Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for the duty-board backend
//! - Query services that drive the shared cache in `watchbill-common`
//! - Pure view assembly for the schedule screen
//!
//! ## Architecture Principles
//! - Only depends on `watchbill-common` and `watchbill-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits

pub mod person;
pub mod schedule;

// Re-export specific items to avoid ambiguity
pub use person::{PersonCache, PersonDetailService};
pub use schedule::ports::{DynScheduleGateway, ScheduleGateway};
pub use schedule::view::{build_schedule_view, CalendarView, EventView, PersonRef, ScheduleView};
pub use schedule::{RosterCache, RosterService};
