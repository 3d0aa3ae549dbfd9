//! Observable state of one cached key.

use std::sync::Arc;

/// Lifecycle phase of a cache entry.
///
/// `Success` and `Error` are re-entrant: a new fetch cycle moves the entry
/// back to `Loading` while the previous data keeps being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Nothing known for this key.
    Empty,
    /// A fetch cycle is in flight.
    Loading,
    /// The latest applied cycle succeeded.
    Success,
    /// The latest applied cycle exhausted its retries.
    Error,
}

/// Point-in-time view of one key, handed to consumers.
///
/// `data` and `error` can coexist: after a failed refresh the last good
/// data is retained next to the error.
#[derive(Debug)]
pub struct QuerySnapshot<V, E> {
    pub status: QueryStatus,
    pub data: Option<Arc<V>>,
    pub error: Option<Arc<E>>,
    /// Whether `data` is past its stale time (or has never been fetched).
    pub stale: bool,
    /// Monotonic change counter for this key, for cheap change detection.
    pub revision: u64,
}

impl<V, E> QuerySnapshot<V, E> {
    /// Snapshot of a key the cache knows nothing about.
    pub fn empty() -> Self {
        Self { status: QueryStatus::Empty, data: None, error: None, stale: true, revision: 0 }
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// True while a background refresh runs behind already-served data.
    pub fn is_refreshing(&self) -> bool {
        self.status == QueryStatus::Loading && self.data.is_some()
    }
}

impl<V, E> Clone for QuerySnapshot<V, E> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            stale: self.stale,
            revision: self.revision,
        }
    }
}
