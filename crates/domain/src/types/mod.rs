//! Data types served by the duty-board backend.
//!
//! The backend emits snake_case JSON; payloads are key-normalized to
//! camelCase before decoding (see the infra wire module), so every struct
//! here derives with `rename_all = "camelCase"`.

mod person;
mod schedule;

pub use person::{ExtraInfo, PersonDetail};
pub use schedule::{CalendarEntry, DisplayConfig, OnCallEvent, PersonSummary, RosterSnapshot};
