//! Screen commands - shell to data layer bridge

mod person;
mod schedule;

pub use person::*;
pub use schedule::*;
