//! Query definitions and the observers views hold on to.

use futures_util::future::BoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::watch;

use crate::cache::QueryClient;
use crate::error::{QueryError, Result};
use crate::key::QueryKey;
use crate::options::QueryOptions;

/// A read query: how to key it, when it may run, and how to fetch it.
///
/// `fetch` returns a `'static` future so the cache can run it on its own
/// task and share it between callers.
pub trait QueryDef: Send + Sync + 'static {
    type Params: Clone + PartialEq + Send + Sync + 'static;
    type Data: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    fn key(&self, params: &Self::Params) -> QueryKey;

    fn options(&self) -> QueryOptions;

    /// Disabled queries never fetch. Detail queries are disabled until they
    /// have an id.
    fn enabled(&self, _params: &Self::Params) -> bool {
        true
    }

    fn fetch(&self, params: Self::Params) -> BoxFuture<'static, Result<Self::Data>>;
}

impl QueryClient {
    /// Run a query definition once through the cache.
    ///
    /// A disabled query fails with [`QueryError::MissingId`] before anything
    /// is fetched.
    pub async fn query<Q: QueryDef>(&self, def: &Arc<Q>, params: Q::Params) -> Result<Q::Data> {
        let key = def.key(&params);
        if !def.enabled(&params) {
            return Err(QueryError::MissingId(key));
        }
        let options = def.options();
        let def = Arc::clone(def);
        self.fetch_query(key, &options, move || def.fetch(params.clone()))
            .await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Disabled, or not loaded yet.
    Idle,
    /// No data for the current key yet.
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct QueryState<T> {
    pub status: QueryStatus,
    pub data: Option<T>,
    pub error: Option<QueryError>,
    /// `data` belongs to the previous key and is shown while the current
    /// key loads.
    pub is_placeholder: bool,
    pub is_fetching: bool,
}

impl<T> QueryState<T> {
    pub fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            is_placeholder: false,
            is_fetching: false,
        }
    }

    pub fn success(data: T) -> Self {
        Self {
            status: QueryStatus::Success,
            data: Some(data),
            error: None,
            is_placeholder: false,
            is_fetching: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }
}

/// A view's subscription to one query whose parameters can change.
///
/// State changes are published on a `watch` channel. Changing parameters to
/// an enabled value fetches the new key exactly once.
pub struct QueryObserver<Q: QueryDef> {
    client: QueryClient,
    def: Arc<Q>,
    params: Q::Params,
    state: watch::Sender<QueryState<Q::Data>>,
}

impl<Q: QueryDef> QueryObserver<Q> {
    /// Creates the observer without fetching. Cached data for the initial
    /// key is shown right away.
    pub fn new(client: QueryClient, def: Arc<Q>, params: Q::Params) -> Self {
        let initial = if def.enabled(&params) {
            client
                .get_query_data(&def.key(&params))
                .map(QueryState::success)
                .unwrap_or_else(QueryState::idle)
        } else {
            QueryState::idle()
        };
        let (state, _) = watch::channel(initial);
        Self {
            client,
            def,
            params,
            state,
        }
    }

    pub fn params(&self) -> &Q::Params {
        &self.params
    }

    pub fn key(&self) -> QueryKey {
        self.def.key(&self.params)
    }

    pub fn is_enabled(&self) -> bool {
        self.def.enabled(&self.params)
    }

    pub fn state(&self) -> QueryState<Q::Data> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState<Q::Data>> {
        self.state.subscribe()
    }

    /// Switch to new parameters. Equal parameters are a no-op.
    pub async fn set_params(&mut self, params: Q::Params) -> QueryState<Q::Data> {
        if params == self.params {
            return self.state();
        }
        self.params = params;
        self.run(false).await
    }

    /// Load the current key, using the cache while it is fresh.
    pub async fn load(&mut self) -> QueryState<Q::Data> {
        self.run(false).await
    }

    pub async fn refetch(&mut self) -> QueryState<Q::Data> {
        self.run(true).await
    }

    /// Re-read the cache without fetching. Picks up primed and optimistic
    /// writes made by mutations.
    pub fn sync(&self) -> QueryState<Q::Data> {
        if !self.is_enabled() {
            return self.state();
        }
        if let Some(data) = self.client.get_query_data(&self.key()) {
            self.state.send_replace(QueryState::success(data));
        }
        self.state()
    }

    async fn run(&mut self, force: bool) -> QueryState<Q::Data> {
        if !self.is_enabled() {
            self.state.send_replace(QueryState::idle());
            return self.state();
        }

        let key = self.key();
        let options = self.def.options();
        let cached: Option<Q::Data> = self.client.get_query_data(&key);

        if !force && !self.client.is_stale(&key, options.stale_time) {
            if let Some(data) = cached {
                self.state.send_replace(QueryState::success(data));
                return self.state();
            }
        }

        let previous = self.state();
        let pending = match cached {
            Some(data) => QueryState {
                is_fetching: true,
                ..QueryState::success(data)
            },
            None if options.keep_previous_data && previous.data.is_some() => QueryState {
                status: QueryStatus::Loading,
                data: previous.data,
                error: None,
                is_placeholder: true,
                is_fetching: true,
            },
            None => QueryState {
                status: QueryStatus::Loading,
                is_fetching: true,
                ..QueryState::idle()
            },
        };
        self.state.send_replace(pending);

        let def = Arc::clone(&self.def);
        let params = self.params.clone();
        let fetcher = move || def.fetch(params.clone());
        let outcome = if force {
            self.client.refetch_query(key.clone(), &options, fetcher).await
        } else {
            self.client.fetch_query(key.clone(), &options, fetcher).await
        };

        let next = match outcome {
            Ok(data) => QueryState::success(data),
            Err(err) => QueryState {
                status: QueryStatus::Error,
                data: self.client.get_query_data(&key),
                error: Some(err),
                is_placeholder: false,
                is_fetching: false,
            },
        };
        self.state.send_replace(next);
        self.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;
    use futures_util::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    struct NoticeDetail {
        calls: Arc<AtomicUsize>,
    }

    impl QueryDef for NoticeDetail {
        type Params = Option<i64>;
        type Data = String;

        fn key(&self, id: &Option<i64>) -> QueryKey {
            keys::notice_detail(*id)
        }

        fn options(&self) -> QueryOptions {
            QueryOptions::new(Duration::from_secs(60))
        }

        fn enabled(&self, id: &Option<i64>) -> bool {
            id.is_some()
        }

        fn fetch(&self, id: Option<i64>) -> BoxFuture<'static, Result<String>> {
            let calls = self.calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(format!("notice {}", id.unwrap_or_default()))
            }
            .boxed()
        }
    }

    struct NoticePages {
        gate: Arc<Notify>,
    }

    impl QueryDef for NoticePages {
        type Params = u32;
        type Data = Vec<String>;

        fn key(&self, page: &u32) -> QueryKey {
            keys::notices_list(*page, 10)
        }

        fn options(&self) -> QueryOptions {
            QueryOptions::new(Duration::from_secs(30)).keep_previous_data()
        }

        fn fetch(&self, page: u32) -> BoxFuture<'static, Result<Vec<String>>> {
            let gate = self.gate.clone();
            async move {
                gate.notified().await;
                Ok(vec![format!("p{page}-a"), format!("p{page}-b")])
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_detail_disabled_until_id_supplied() {
        let calls = Arc::new(AtomicUsize::new(0));
        let def = Arc::new(NoticeDetail {
            calls: calls.clone(),
        });
        let client = QueryClient::new();
        let mut observer = QueryObserver::new(client.clone(), def.clone(), None);

        let state = observer.load().await;
        assert_eq!(state.status, QueryStatus::Idle);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(client.is_empty());

        let state = observer.set_params(Some(7)).await;
        assert!(state.is_success());
        assert_eq!(state.data.as_deref(), Some("notice 7"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        observer.set_params(Some(7)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_id_rejected_without_fetch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let def = Arc::new(NoticeDetail {
            calls: calls.clone(),
        });
        let client = QueryClient::new();
        let err = client.query(&def, None).await.unwrap_err();
        assert!(matches!(err, QueryError::MissingId(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_previous_page_kept_as_placeholder() {
        let gate = Arc::new(Notify::new());
        let def = Arc::new(NoticePages { gate: gate.clone() });
        let mut observer = QueryObserver::new(QueryClient::new(), def, 1);

        gate.notify_one();
        let first = observer.load().await;
        assert_eq!(first.data.as_ref().map(Vec::len), Some(2));

        let mut states = observer.subscribe();
        let task = tokio::spawn(async move {
            observer.set_params(2).await;
            observer
        });

        states.changed().await.unwrap();
        let loading = states.borrow_and_update().clone();
        assert_eq!(loading.status, QueryStatus::Loading);
        assert!(loading.is_placeholder);
        assert_eq!(loading.data.unwrap()[0], "p1-a");

        gate.notify_one();
        let observer = task.await.unwrap();
        let loaded = observer.state();
        assert!(loaded.is_success());
        assert!(!loaded.is_placeholder);
        assert_eq!(loaded.data.unwrap()[0], "p2-a");
    }

    #[tokio::test]
    async fn test_sync_picks_up_cache_writes() {
        let def = Arc::new(NoticeDetail {
            calls: Arc::new(AtomicUsize::new(0)),
        });
        let client = QueryClient::new();
        let observer = QueryObserver::new(client.clone(), def, Some(3));
        assert_eq!(observer.state().status, QueryStatus::Idle);

        client
            .set_query_data(keys::notice_detail(Some(3)), &"primed")
            .unwrap();
        assert_eq!(observer.sync().data.as_deref(), Some("primed"));
    }
}
