//! Process-wide query cache.
//!
//! Entries live in a `DashMap` keyed by [`QueryKey`] and hold the last good
//! value as JSON, so one cache serves every response type. A fetch runs in
//! its own tokio task; concurrent readers of the same key join that task
//! through a shared future instead of issuing a second request.

use backon::Retryable;
use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tokio::task::AbortHandle;
use tracing::{debug, trace, warn};

use crate::error::{QueryError, Result};
use crate::key::{KeyFilter, QueryKey};
use crate::options::QueryOptions;

const EVENT_BUFFER_SIZE: usize = 256;

type SharedFetch = Shared<BoxFuture<'static, Result<Value>>>;

/// Change notifications for views that mirror cache contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    Updated(QueryKey),
    Invalidated(QueryKey),
    Cancelled(QueryKey),
    Removed(QueryKey),
}

struct InFlight {
    id: u64,
    abort: AbortHandle,
    result: SharedFetch,
}

#[derive(Default)]
struct CacheEntry {
    data: Option<Value>,
    updated_at: Option<Instant>,
    invalidated: bool,
    error: Option<QueryError>,
    in_flight: Option<InFlight>,
}

impl CacheEntry {
    fn is_fresh(&self, stale_time: Duration) -> bool {
        !self.invalidated
            && self.data.is_some()
            && self
                .updated_at
                .is_some_and(|at| at.elapsed() < stale_time)
    }

    fn cancel(&mut self) -> bool {
        match self.in_flight.take() {
            Some(in_flight) => {
                in_flight.abort.abort();
                true
            }
            None => false,
        }
    }

    fn store(&mut self, value: Value) {
        self.data = Some(value);
        self.updated_at = Some(Instant::now());
        self.invalidated = false;
        self.error = None;
    }
}

/// Read-only view of one cache entry.
#[derive(Debug, Clone)]
pub struct EntrySnapshot {
    pub data: Option<Value>,
    pub updated_at: Option<Instant>,
    pub invalidated: bool,
    pub is_fetching: bool,
    pub error: Option<QueryError>,
}

struct Inner {
    entries: DashMap<QueryKey, CacheEntry>,
    next_fetch_id: AtomicU64,
    events: broadcast::Sender<CacheEvent>,
}

impl Inner {
    fn emit(&self, event: CacheEvent) {
        let _ = self.events.send(event);
    }

    /// Record a finished fetch. Results of fetches that were cancelled or
    /// whose entry was removed are dropped.
    fn settle(&self, key: &QueryKey, fetch_id: u64, outcome: &Result<Value>) {
        let Some(mut entry) = self.entries.get_mut(key) else {
            trace!(%key, "entry removed while fetching, result discarded");
            return;
        };
        if entry.in_flight.as_ref().map(|f| f.id) != Some(fetch_id) {
            trace!(%key, fetch_id, "superseded fetch result discarded");
            return;
        }
        entry.in_flight = None;
        match outcome {
            Ok(value) => entry.store(value.clone()),
            Err(err) => entry.error = Some(err.clone()),
        }
        drop(entry);
        self.emit(CacheEvent::Updated(key.clone()));
    }
}

/// Handle to the shared cache. Cheap to clone; all clones see one cache.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

impl QueryClient {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self {
            inner: Arc::new(Inner {
                entries: DashMap::new(),
                next_fetch_id: AtomicU64::new(1),
                events,
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.inner.events.subscribe()
    }

    /// Serve `key` from cache while fresh, otherwise fetch it.
    pub async fn fetch_query<T, F, Fut>(
        &self,
        key: QueryKey,
        options: &QueryOptions,
        fetcher: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        if let Some(value) = self.fresh_value(&key, options.stale_time) {
            trace!(%key, "cache hit");
            return Ok(serde_json::from_value(value)?);
        }
        let value = self.start_or_join(key, options, fetcher).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetch `key` even if the cached value is fresh. Still joins a fetch
    /// that is already running.
    pub async fn refetch_query<T, F, Fut>(
        &self,
        key: QueryKey,
        options: &QueryOptions,
        fetcher: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let value = self.start_or_join(key, options, fetcher).await?;
        Ok(serde_json::from_value(value)?)
    }

    fn fresh_value(&self, key: &QueryKey, stale_time: Duration) -> Option<Value> {
        let entry = self.inner.entries.get(key)?;
        if entry.is_fresh(stale_time) {
            entry.data.clone()
        } else {
            None
        }
    }

    fn start_or_join<T, F, Fut>(
        &self,
        key: QueryKey,
        options: &QueryOptions,
        fetcher: F,
    ) -> SharedFetch
    where
        T: Serialize + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        // The entry guard is held until `in_flight` is set so the task can
        // never settle before it is registered.
        let mut entry = self.inner.entries.entry(key.clone()).or_default();
        if let Some(in_flight) = &entry.in_flight {
            debug!(%key, "joining in-flight fetch");
            return in_flight.result.clone();
        }

        let fetch_id = self.inner.next_fetch_id.fetch_add(1, Ordering::Relaxed);
        let backoff = options.retry.backoff();
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let task_key = key.clone();
        debug!(%key, fetch_id, "fetch started");

        let handle = tokio::spawn(async move {
            let outcome = fetcher
                .retry(backoff)
                .when(QueryError::is_retryable)
                .notify(|err: &QueryError, dur: Duration| {
                    warn!(
                        key = %task_key,
                        "query failed, retrying after {:.2}s: {}",
                        dur.as_secs_f64(),
                        err
                    );
                })
                .await
                .and_then(|data| serde_json::to_value(data).map_err(QueryError::from));
            if let Some(inner) = weak.upgrade() {
                inner.settle(&task_key, fetch_id, &outcome);
            }
            outcome
        });

        let abort = handle.abort_handle();
        let cancel_key = key.clone();
        let result = async move {
            match handle.await {
                Ok(outcome) => outcome,
                Err(err) if err.is_cancelled() => Err(QueryError::Cancelled(cancel_key)),
                Err(err) => Err(QueryError::Task(err.to_string())),
            }
        }
        .boxed()
        .shared();

        entry.in_flight = Some(InFlight {
            id: fetch_id,
            abort,
            result: result.clone(),
        });
        result
    }

    /// Decoded cached value, stale or not.
    pub fn get_query_data<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let value = self.get_query_value(key)?;
        match serde_json::from_value(value) {
            Ok(data) => Some(data),
            Err(err) => {
                warn!(%key, error = %err, "cached value has unexpected shape");
                None
            }
        }
    }

    pub fn get_query_value(&self, key: &QueryKey) -> Option<Value> {
        self.inner.entries.get(key)?.data.clone()
    }

    /// Write a value as if it had just been fetched.
    pub fn set_query_data<T: Serialize>(&self, key: QueryKey, data: &T) -> Result<()> {
        let value = serde_json::to_value(data)?;
        self.set_query_value(key, value);
        Ok(())
    }

    pub fn set_query_value(&self, key: QueryKey, value: Value) {
        self.inner
            .entries
            .entry(key.clone())
            .or_default()
            .store(value);
        trace!(%key, "cache write");
        self.inner.emit(CacheEvent::Updated(key));
    }

    /// Put back a value captured with [`get_query_value`](Self::get_query_value).
    /// `None` empties the entry.
    pub fn restore_query_value(&self, key: QueryKey, snapshot: Option<Value>) {
        match snapshot {
            Some(value) => self.set_query_value(key, value),
            None => {
                if let Some(mut entry) = self.inner.entries.get_mut(&key) {
                    entry.data = None;
                    entry.updated_at = None;
                }
                self.inner.emit(CacheEvent::Updated(key));
            }
        }
    }

    pub fn peek(&self, key: &QueryKey) -> Option<EntrySnapshot> {
        self.inner.entries.get(key).map(|entry| EntrySnapshot {
            data: entry.data.clone(),
            updated_at: entry.updated_at,
            invalidated: entry.invalidated,
            is_fetching: entry.in_flight.is_some(),
            error: entry.error.clone(),
        })
    }

    pub fn is_stale(&self, key: &QueryKey, stale_time: Duration) -> bool {
        self.inner
            .entries
            .get(key)
            .is_none_or(|entry| !entry.is_fresh(stale_time))
    }

    /// Mark matching entries stale. Their data stays readable until the next
    /// fetch replaces it. Fetches already running are left alone.
    pub fn invalidate_queries(&self, filter: &KeyFilter) -> usize {
        let mut invalidated = Vec::new();
        for mut entry in self.inner.entries.iter_mut() {
            if filter.matches(entry.key()) {
                entry.invalidated = true;
                invalidated.push(entry.key().clone());
            }
        }
        debug!(%filter, count = invalidated.len(), "queries invalidated");
        let count = invalidated.len();
        for key in invalidated {
            self.inner.emit(CacheEvent::Invalidated(key));
        }
        count
    }

    /// Abort running fetches for matching keys. Joined callers get
    /// [`QueryError::Cancelled`]; cached data is kept.
    pub fn cancel_queries(&self, filter: &KeyFilter) -> usize {
        let mut cancelled = Vec::new();
        for mut entry in self.inner.entries.iter_mut() {
            if filter.matches(entry.key()) && entry.cancel() {
                cancelled.push(entry.key().clone());
            }
        }
        if !cancelled.is_empty() {
            debug!(%filter, count = cancelled.len(), "in-flight queries cancelled");
        }
        let count = cancelled.len();
        for key in cancelled {
            self.inner.emit(CacheEvent::Cancelled(key));
        }
        count
    }

    /// Drop matching entries, cancelling their fetches.
    pub fn remove_queries(&self, filter: &KeyFilter) -> usize {
        let mut removed = Vec::new();
        self.inner.entries.retain(|key, entry| {
            if filter.matches(key) {
                entry.cancel();
                removed.push(key.clone());
                false
            } else {
                true
            }
        });
        let count = removed.len();
        for key in removed {
            self.inner.emit(CacheEvent::Removed(key));
        }
        count
    }

    pub fn clear(&self) {
        let count = self.remove_queries(&KeyFilter::All);
        debug!(count, "query cache cleared");
    }

    pub fn keys(&self, filter: &KeyFilter) -> Vec<QueryKey> {
        let mut keys: Vec<QueryKey> = self
            .inner
            .entries
            .iter()
            .filter(|entry| filter.matches(entry.key()))
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("entries", &self.inner.entries.len())
            .finish()
    }
}
