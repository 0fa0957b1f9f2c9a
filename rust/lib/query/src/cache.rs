//! Generic single-slot and keyed query caches.
//!
//! A cache slot is either empty, fresh, or stale. `get_or_fetch`
//! serves fresh values without running the fetcher; stale or empty
//! slots fetch under the write lock, so concurrent callers coalesce
//! into one request and the late ones see the refreshed value on their
//! double-check. Fetch failures leave any previous value in place.

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, warn};

// ── Retry ───────────────────────────────────────────────────────────

/// Errors that may succeed on a retry of the same request.
pub trait TransientError {
    fn is_transient(&self) -> bool;
}

impl TransientError for celulog_client::ApiError {
    fn is_transient(&self) -> bool {
        celulog_client::ApiError::is_transient(self)
    }
}

/// How often a failed fetch is re-attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure.
    pub retries: u32,
    /// Pause between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Fail on the first error.
    pub const fn none() -> Self {
        Self {
            retries: 0,
            delay: Duration::ZERO,
        }
    }

    /// Retry transient failures up to `retries` times with a short
    /// fixed pause.
    pub const fn transient(retries: u32) -> Self {
        Self {
            retries,
            delay: Duration::from_millis(200),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Run `fetch` until it succeeds, the error is not transient, or the
/// retry budget is spent.
pub async fn run_with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    name: &str,
    mut fetch: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: TransientError + Display,
{
    let mut attempt: u32 = 0;
    loop {
        match fetch().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= policy.retries || !err.is_transient() {
                    return Err(err);
                }
                attempt += 1;
                warn!(query = name, attempt, error = %err, "retrying after transient failure");
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}

// ── Status ──────────────────────────────────────────────────────────

/// Observable lifecycle of a cached query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStatus {
    /// Never fetched.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// Holds a fresh value.
    Ready,
    /// Holds a value that a mutation has marked out of date.
    Stale,
    /// Last fetch failed; the message is the stringified error.
    Failed(String),
}

// ── CachedQuery ─────────────────────────────────────────────────────

struct Slot<T> {
    value: Option<T>,
    stale: bool,
    last_error: Option<String>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            value: None,
            stale: false,
            last_error: None,
        }
    }
}

/// Single-slot cache for an unparameterized query.
pub struct CachedQuery<T> {
    name: &'static str,
    retry: RetryPolicy,
    fetching: AtomicBool,
    slot: RwLock<Slot<T>>,
}

impl<T: Clone> CachedQuery<T> {
    pub fn new(name: &'static str, retry: RetryPolicy) -> Self {
        Self {
            name,
            retry,
            fetching: AtomicBool::new(false),
            slot: RwLock::new(Slot::default()),
        }
    }

    /// Return the cached value, fetching only when the slot is empty
    /// or stale.
    pub async fn get_or_fetch<E, F, Fut>(&self, fetch: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: TransientError + Display,
    {
        {
            let slot = self.slot.read().await;
            if !slot.stale {
                if let Some(value) = &slot.value {
                    debug!(query = self.name, "cache hit");
                    return Ok(value.clone());
                }
            }
        }

        let mut slot = self.slot.write().await;
        // Double-check: a concurrent caller may have refreshed the
        // slot while we waited for the write lock.
        if !slot.stale {
            if let Some(value) = &slot.value {
                return Ok(value.clone());
            }
        }

        self.fetching.store(true, Ordering::SeqCst);
        let result = run_with_retry(&self.retry, self.name, fetch).await;
        self.fetching.store(false, Ordering::SeqCst);

        match result {
            Ok(value) => {
                slot.value = Some(value.clone());
                slot.stale = false;
                slot.last_error = None;
                debug!(query = self.name, "cache filled");
                Ok(value)
            }
            Err(err) => {
                slot.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Mark the slot stale. The next `get_or_fetch` refetches once;
    /// later calls hit the refreshed cache.
    pub async fn invalidate(&self) {
        let mut slot = self.slot.write().await;
        slot.stale = true;
        debug!(query = self.name, "invalidated");
    }

    /// Peek at the cached value without fetching.
    pub async fn cached(&self) -> Option<T> {
        self.slot.read().await.value.clone()
    }

    pub async fn status(&self) -> QueryStatus {
        if self.fetching.load(Ordering::SeqCst) {
            return QueryStatus::Loading;
        }
        let slot = self.slot.read().await;
        if let Some(message) = &slot.last_error {
            return QueryStatus::Failed(message.clone());
        }
        match (&slot.value, slot.stale) {
            (None, _) => QueryStatus::Idle,
            (Some(_), true) => QueryStatus::Stale,
            (Some(_), false) => QueryStatus::Ready,
        }
    }
}

// ── KeyedQuery ──────────────────────────────────────────────────────

struct Entry<T> {
    value: T,
    stale: bool,
}

/// Cache with one slot per key, for parameterized queries. Each
/// distinct key caches independently; invalidation sweeps every key,
/// matching how a mutation outdates all prior search results at once.
pub struct KeyedQuery<K, T> {
    name: &'static str,
    retry: RetryPolicy,
    entries: RwLock<HashMap<K, Entry<T>>>,
}

impl<K, T> KeyedQuery<K, T>
where
    K: Clone + Eq + Hash,
    T: Clone,
{
    pub fn new(name: &'static str, retry: RetryPolicy) -> Self {
        Self {
            name,
            retry,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get_or_fetch<E, F, Fut>(&self, key: &K, fetch: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: TransientError + Display,
    {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(key) {
                if !entry.stale {
                    debug!(query = self.name, "cache hit");
                    return Ok(entry.value.clone());
                }
            }
        }

        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(key) {
            if !entry.stale {
                return Ok(entry.value.clone());
            }
        }

        let value = run_with_retry(&self.retry, self.name, fetch).await?;
        entries.insert(
            key.clone(),
            Entry {
                value: value.clone(),
                stale: false,
            },
        );
        debug!(query = self.name, "cache filled");
        Ok(value)
    }

    /// Mark every cached key stale.
    pub async fn invalidate_all(&self) {
        let mut entries = self.entries.write().await;
        for entry in entries.values_mut() {
            entry.stale = true;
        }
        debug!(query = self.name, keys = entries.len(), "invalidated");
    }

    /// Peek at a key's value; stale entries read as absent.
    pub async fn cached(&self, key: &K) -> Option<T> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| !entry.stale)
            .map(|entry| entry.value.clone())
    }

    pub async fn status(&self) -> QueryStatus {
        let entries = self.entries.read().await;
        if entries.is_empty() {
            QueryStatus::Idle
        } else if entries.values().any(|entry| !entry.stale) {
            QueryStatus::Ready
        } else {
            QueryStatus::Stale
        }
    }
}
