//! Wire-format helpers for backend payloads.

pub mod normalize;

pub use normalize::camelize_keys;
