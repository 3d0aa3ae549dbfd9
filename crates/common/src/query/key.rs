//! Semantic cache keys.

use std::fmt;

/// A cache key made of an endpoint scope plus identifying parameters,
/// e.g. `schedule/Europe/Amsterdam` or `person/42/UTC`.
///
/// Equality is segment-wise, so `["a", "b/c"]` and `["a/b", "c"]` are
/// distinct keys even though they render the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// Start a key with its scope segment.
    pub fn new(scope: impl Into<String>) -> Self {
        Self(vec![scope.into()])
    }

    /// Append one identifying segment.
    #[must_use]
    pub fn with(mut self, segment: impl fmt::Display) -> Self {
        self.0.push(segment.to_string());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}
