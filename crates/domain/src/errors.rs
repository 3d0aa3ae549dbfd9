//! Error types used throughout the application

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One entry of a backend validation failure.
///
/// The backend rejects malformed query parameters with a list of these
/// (`{loc, msg, type}`); `loc` is the path to the offending input, e.g.
/// `["query", "timezone"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.loc.join("."), self.msg)
    }
}

fn fmt_violations(violations: &[FieldViolation]) -> String {
    violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Main error type for Watchbill
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum WatchbillError {
    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("Server returned {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The backend rejected the request parameters (HTTP 422).
    #[error("Validation failed: {}", fmt_violations(.0))]
    Validation(Vec<FieldViolation>),

    /// The response body could not be decoded into the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WatchbillError {
    /// Human-readable description, preferring server-provided detail over
    /// the generic wrapper text.
    pub fn description(&self) -> String {
        match self {
            Self::Status { detail, .. } if !detail.is_empty() => detail.clone(),
            Self::Validation(violations) => fmt_violations(violations),
            other => other.to_string(),
        }
    }
}

/// Result type alias for Watchbill operations
pub type Result<T> = std::result::Result<T, WatchbillError>;
