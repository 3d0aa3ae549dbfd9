//! HTTP access to the duty-board backend.

pub mod client;

pub use client::{ScheduleClient, ScheduleClientConfig};
