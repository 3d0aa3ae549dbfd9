//! Async query cache: one fetch-and-cache state machine per key.
//!
//! Uses `tokio::sync::RwLock` over a `HashMap` of entries. Fetches run in
//! spawned tasks; completions re-acquire the lock and are applied only if
//! they belong to the latest issued cycle for their key, so late responses
//! from superseded or evicted fetches are discarded instead of clobbering
//! newer state.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use tokio::sync::{watch, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::policy::QueryPolicy;
use super::report::{ErrorReport, ErrorReporter};
use super::snapshot::{QuerySnapshot, QueryStatus};
use crate::time::{Clock, SystemClock};

/// Retained fetch closure: each call starts one attempt.
type Fetcher<V, E> = Arc<dyn Fn() -> BoxFuture<'static, Result<V, E>> + Send + Sync>;

/// Internal state of one cached key.
struct QueryEntry<V, E> {
    status: QueryStatus,
    data: Option<Arc<V>>,
    error: Option<Arc<E>>,
    /// Completion instant of the last successful fetch. `None` means the
    /// data was seeded (initial data) and is therefore always stale.
    updated_at: Option<Instant>,
    stale_time: Duration,
    retry_count: u32,
    retry_delay: Duration,
    refetch_on_focus: bool,
    /// Sequence number of the latest issued fetch cycle for this key.
    issued_seq: u64,
    observers: Arc<AtomicUsize>,
    /// Child of the cache shutdown token; cancelled when the last
    /// observer drops, which aborts pending retry waits.
    timers: CancellationToken,
    /// Bumped on every visible state change; `settled` waits on it.
    revision: watch::Sender<u64>,
    fetcher: Fetcher<V, E>,
    invalidated: bool,
}

impl<V, E> QueryEntry<V, E> {
    fn is_stale(&self, now: Instant) -> bool {
        match self.updated_at {
            None => true,
            Some(at) => now.saturating_duration_since(at) >= self.stale_time,
        }
    }

    fn bump(&mut self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

struct CacheInner<K, V, E>
where
    K: Eq + Hash,
{
    entries: RwLock<HashMap<K, QueryEntry<V, E>>>,
    reporter: Arc<dyn ErrorReporter>,
    clock: Arc<dyn Clock>,
    next_seq: AtomicU64,
    shutdown: CancellationToken,
}

impl<K, V, E> CacheInner<K, V, E>
where
    K: Eq + Hash + Clone + fmt::Display + Send + Sync + 'static,
    V: Send + Sync + 'static,
    E: fmt::Display + Send + Sync + 'static,
{
    async fn apply_success(&self, key: &K, seq: u64, value: V) {
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.get_mut(key) else {
            debug!(key = %key, seq, "discarding fetch result for evicted key");
            return;
        };
        if entry.issued_seq != seq {
            debug!(key = %key, seq, latest = entry.issued_seq, "discarding superseded fetch result");
            return;
        }
        entry.data = Some(Arc::new(value));
        entry.error = None;
        entry.status = QueryStatus::Success;
        entry.updated_at = Some(self.clock.now());
        entry.bump();
    }

    async fn apply_error(&self, key: &K, seq: u64, error: E) {
        let report = {
            let mut entries = self.entries.write().await;
            let Some(entry) = entries.get_mut(key) else {
                debug!(key = %key, seq, "discarding fetch failure for evicted key");
                return;
            };
            if entry.issued_seq != seq {
                debug!(key = %key, seq, latest = entry.issued_seq, "discarding superseded fetch failure");
                return;
            }
            let report = ErrorReport::new(error.to_string())
                .with_title(format!("{key} request failed"));
            // Last good data outlives the failure
            entry.error = Some(Arc::new(error));
            entry.status = QueryStatus::Error;
            entry.bump();
            report
        };
        // Reporter runs outside the lock; it must not block cache access
        self.reporter.notify(report);
    }

    /// Called when a fetch cycle is cancelled during its retry wait. The
    /// entry leaves `Loading` without a completion: back to `Success` if
    /// it still has data, gone otherwise.
    async fn abandon(&self, key: &K, seq: u64) {
        let mut entries = self.entries.write().await;
        let keep = match entries.get_mut(key) {
            None => return,
            Some(entry) if entry.issued_seq != seq => return,
            Some(entry) => {
                debug!(key = %key, seq, "fetch cycle cancelled during retry wait");
                if entry.data.is_some() {
                    entry.status = QueryStatus::Success;
                    entry.bump();
                    true
                } else {
                    false
                }
            }
        };
        if !keep {
            entries.remove(key);
        }
    }
}

/// One fetch cycle: initial attempt plus up to `retries` retries with a
/// fixed delay. Cancelling `timers` aborts a pending wait but never an
/// attempt already in flight.
async fn run_fetch<K, V, E>(
    inner: Arc<CacheInner<K, V, E>>,
    key: K,
    seq: u64,
    fetcher: Fetcher<V, E>,
    retries: u32,
    delay: Duration,
    timers: CancellationToken,
) where
    K: Eq + Hash + Clone + fmt::Display + Send + Sync + 'static,
    V: Send + Sync + 'static,
    E: fmt::Display + Send + Sync + 'static,
{
    let mut attempt: u32 = 0;
    loop {
        match fetcher().await {
            Ok(value) => {
                inner.apply_success(&key, seq, value).await;
                return;
            }
            Err(error) => {
                if attempt < retries {
                    attempt += 1;
                    debug!(
                        key = %key,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "fetch attempt failed, retrying"
                    );
                    tokio::select! {
                        () = timers.cancelled() => {
                            inner.abandon(&key, seq).await;
                            return;
                        }
                        () = tokio::time::sleep(delay) => {}
                    }
                    continue;
                }
                inner.apply_error(&key, seq, error).await;
                return;
            }
        }
    }
}

/// Keyed fetch-and-cache engine.
///
/// Every key holds an independent `Empty → Loading → Success/Error` state
/// machine (see the module docs). Concurrent requests for one key share a
/// single in-flight fetch; stale data keeps being served while a refresh
/// runs; exhausted fetch cycles notify the [`ErrorReporter`] exactly once.
///
/// Cloning is cheap and shares the underlying cache.
pub struct QueryCache<K, V, E>
where
    K: Eq + Hash,
{
    inner: Arc<CacheInner<K, V, E>>,
}

impl<K, V, E> Clone for QueryCache<K, V, E>
where
    K: Eq + Hash,
{
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

/// Guard representing one interested consumer of a key.
///
/// When the last observer of a key drops, pending retry timers for that
/// key are cancelled; an attempt already in flight still completes.
#[must_use = "dropping the last observer cancels the key's pending retry timers"]
pub struct QueryObserver {
    observers: Arc<AtomicUsize>,
    timers: CancellationToken,
}

impl Drop for QueryObserver {
    fn drop(&mut self) {
        if self.observers.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.timers.cancel();
        }
    }
}

impl<K, V, E> QueryCache<K, V, E>
where
    K: Eq + Hash + Clone + fmt::Display + Send + Sync + 'static,
    V: Send + Sync + 'static,
    E: fmt::Display + Send + Sync + 'static,
{
    /// Creates a cache with the system clock.
    pub fn new(reporter: Arc<dyn ErrorReporter>) -> Self {
        Self::with_clock(reporter, Arc::new(SystemClock))
    }

    /// Creates a cache with an injected clock, for deterministic staleness
    /// in tests.
    pub fn with_clock(reporter: Arc<dyn ErrorReporter>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                entries: RwLock::new(HashMap::new()),
                reporter,
                clock,
                next_seq: AtomicU64::new(0),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Requests the value for `key`, returning the current snapshot
    /// immediately.
    ///
    /// Fetch decision:
    /// - unknown key: fetch (initial data, if any, is served meanwhile);
    /// - `Loading`: join the in-flight cycle, never start a second one;
    /// - `Error`: start a new cycle;
    /// - `Success`: start a cycle only if invalidated, or stale with
    ///   `refetch_on_mount` set.
    ///
    /// The fetch closure is retained and reused by [`Self::revalidate`]
    /// and focus refreshes.
    pub async fn request<F, Fut>(
        &self,
        key: K,
        policy: QueryPolicy<V>,
        fetch: F,
    ) -> QuerySnapshot<V, E>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let fetcher: Fetcher<V, E> = Arc::new(move || Box::pin(fetch()));
        self.request_boxed(key, policy, fetcher).await
    }

    async fn request_boxed(
        &self,
        key: K,
        policy: QueryPolicy<V>,
        fetcher: Fetcher<V, E>,
    ) -> QuerySnapshot<V, E> {
        let QueryPolicy {
            stale_time,
            retry_count,
            retry_delay,
            refetch_on_mount,
            refetch_on_focus,
            initial_data,
        } = policy;

        if self.inner.shutdown.is_cancelled() {
            warn!(key = %key, "request against a shut-down query cache");
            return QuerySnapshot {
                status: QueryStatus::Empty,
                data: initial_data.map(Arc::new),
                error: None,
                stale: true,
                revision: 0,
            };
        }

        let now = self.inner.clock.now();
        let mut entries = self.inner.entries.write().await;

        if let Some(entry) = entries.get_mut(&key) {
            entry.stale_time = stale_time;
            entry.retry_count = retry_count;
            entry.retry_delay = retry_delay;
            entry.refetch_on_focus = refetch_on_focus;
            entry.fetcher = fetcher;
            let should_fetch = match entry.status {
                QueryStatus::Loading => false,
                QueryStatus::Error => true,
                QueryStatus::Success | QueryStatus::Empty => {
                    entry.invalidated || (refetch_on_mount && entry.is_stale(now))
                }
            };
            if should_fetch {
                self.launch(&key, entry);
            }
            return self.snapshot_of(entry);
        }

        // Seeded data still triggers the first fetch (it is born stale)
        // unless the caller opted out of mount refetches.
        let should_fetch = initial_data.is_none() || refetch_on_mount;
        let (revision, _) = watch::channel(0);
        let mut entry = QueryEntry {
            status: QueryStatus::Success,
            data: initial_data.map(Arc::new),
            error: None,
            updated_at: None,
            stale_time,
            retry_count,
            retry_delay,
            refetch_on_focus,
            issued_seq: 0,
            observers: Arc::new(AtomicUsize::new(0)),
            timers: self.inner.shutdown.child_token(),
            revision,
            fetcher,
            invalidated: false,
        };
        if should_fetch {
            self.launch(&key, &mut entry);
        }
        let snapshot = self.snapshot_of(&entry);
        entries.insert(key, entry);
        snapshot
    }

    /// Starts a background fetch cycle for an existing key using its
    /// retained fetcher. Returns false if the key is unknown; an already
    /// loading key is left alone and reported as true.
    pub async fn revalidate(&self, key: &K) -> bool {
        if self.inner.shutdown.is_cancelled() {
            return false;
        }
        let mut entries = self.inner.entries.write().await;
        match entries.get_mut(key) {
            None => false,
            Some(entry) => {
                if entry.status != QueryStatus::Loading {
                    self.launch(key, entry);
                }
                true
            }
        }
    }

    /// Marks a key so its next request fetches even if the data is fresh.
    pub async fn invalidate(&self, key: &K) {
        let mut entries = self.inner.entries.write().await;
        if let Some(entry) = entries.get_mut(key) {
            entry.invalidated = true;
        }
    }

    /// Focus notification: refetches every stale, observed entry that
    /// opted into focus refreshes. Returns how many cycles were started.
    pub async fn on_focus(&self) -> usize {
        if self.inner.shutdown.is_cancelled() {
            return 0;
        }
        let now = self.inner.clock.now();
        let mut entries = self.inner.entries.write().await;
        let due: Vec<K> = entries
            .iter()
            .filter(|(_, entry)| {
                entry.refetch_on_focus
                    && entry.status != QueryStatus::Loading
                    && entry.observers.load(Ordering::SeqCst) > 0
                    && entry.is_stale(now)
            })
            .map(|(key, _)| key.clone())
            .collect();
        for key in &due {
            if let Some(entry) = entries.get_mut(key) {
                self.launch(key, entry);
            }
        }
        due.len()
    }

    /// Registers interest in a key. Returns `None` for unknown keys.
    pub async fn watch(&self, key: &K) -> Option<QueryObserver> {
        let mut entries = self.inner.entries.write().await;
        let entry = entries.get_mut(key)?;
        if entry.timers.is_cancelled() && !self.inner.shutdown.is_cancelled() {
            entry.timers = self.inner.shutdown.child_token();
        }
        entry.observers.fetch_add(1, Ordering::SeqCst);
        Some(QueryObserver {
            observers: Arc::clone(&entry.observers),
            timers: entry.timers.clone(),
        })
    }

    /// Current snapshot without triggering any fetch.
    pub async fn peek(&self, key: &K) -> QuerySnapshot<V, E> {
        let entries = self.inner.entries.read().await;
        entries.get(key).map_or_else(QuerySnapshot::empty, |entry| self.snapshot_of(entry))
    }

    /// Waits until the key is out of `Loading` and returns that snapshot.
    /// Unknown (or meanwhile evicted) keys resolve to an empty snapshot.
    pub async fn settled(&self, key: &K) -> QuerySnapshot<V, E> {
        loop {
            let mut receiver = {
                let entries = self.inner.entries.read().await;
                match entries.get(key) {
                    None => return QuerySnapshot::empty(),
                    Some(entry) if entry.status != QueryStatus::Loading => {
                        return self.snapshot_of(entry);
                    }
                    Some(entry) => entry.revision.subscribe(),
                }
            };
            // A closed channel means the entry was removed; re-check.
            let _ = receiver.changed().await;
        }
    }

    /// Drops a key. A fetch still in flight for it will complete and be
    /// discarded; its pending retry timers are cancelled.
    pub async fn remove(&self, key: &K) -> bool {
        let mut entries = self.inner.entries.write().await;
        match entries.remove(key) {
            Some(entry) => {
                entry.timers.cancel();
                true
            }
            None => false,
        }
    }

    /// Evicts every stale entry nobody observes. Entries with a cycle in
    /// flight are kept. Returns the number of evictions.
    pub async fn sweep(&self) -> usize {
        let now = self.inner.clock.now();
        let mut entries = self.inner.entries.write().await;
        let doomed: Vec<K> = entries
            .iter()
            .filter(|(_, entry)| {
                entry.observers.load(Ordering::SeqCst) == 0
                    && entry.status != QueryStatus::Loading
                    && entry.is_stale(now)
            })
            .map(|(key, _)| key.clone())
            .collect();
        for key in &doomed {
            if let Some(entry) = entries.remove(key) {
                entry.timers.cancel();
            }
        }
        doomed.len()
    }

    /// Shuts the cache down: every pending retry timer is cancelled and no
    /// new fetch cycles will start. Idempotent.
    pub async fn shutdown(&self) {
        self.inner.shutdown.cancel();
        let entries = self.inner.entries.read().await;
        debug!(entries = entries.len(), "query cache shut down");
    }

    /// Number of entries, stale and errored ones included.
    pub async fn len(&self) -> usize {
        let entries = self.inner.entries.read().await;
        entries.len()
    }

    /// True when no key has been requested yet or all were evicted.
    pub async fn is_empty(&self) -> bool {
        let entries = self.inner.entries.read().await;
        entries.is_empty()
    }

    /// True when an entry exists for `key`, whatever its state.
    pub async fn contains_key(&self, key: &K) -> bool {
        let entries = self.inner.entries.read().await;
        entries.contains_key(key)
    }

    /// Issues the next fetch cycle for `entry` and spawns it.
    fn launch(&self, key: &K, entry: &mut QueryEntry<V, E>) {
        let seq = self.inner.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
        entry.issued_seq = seq;
        entry.status = QueryStatus::Loading;
        entry.invalidated = false;
        if entry.timers.is_cancelled() && !self.inner.shutdown.is_cancelled() {
            entry.timers = self.inner.shutdown.child_token();
        }
        entry.bump();
        debug!(key = %key, seq, "fetch cycle issued");

        let inner = Arc::clone(&self.inner);
        let key = key.clone();
        let fetcher = Arc::clone(&entry.fetcher);
        let retries = entry.retry_count;
        let delay = entry.retry_delay;
        let timers = entry.timers.clone();
        tokio::spawn(run_fetch(inner, key, seq, fetcher, retries, delay, timers));
    }

    fn snapshot_of(&self, entry: &QueryEntry<V, E>) -> QuerySnapshot<V, E> {
        QuerySnapshot {
            status: entry.status,
            data: entry.data.clone(),
            error: entry.error.clone(),
            stale: entry.is_stale(self.inner.clock.now()),
            revision: *entry.revision.borrow(),
        }
    }
}
