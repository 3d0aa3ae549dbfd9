//! Person detail: query service for the popover card.

pub mod service;

pub use service::{PersonCache, PersonDetailService};
