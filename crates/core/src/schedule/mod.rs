//! Schedule roster: backend port, query service, and view assembly.

pub mod ports;
pub mod service;
pub mod view;

pub use service::{RosterCache, RosterService};
