//! Write-side helpers: coarse invalidation, optimistic updates, priming.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use tracing::{debug, warn};

use crate::cache::QueryClient;
use crate::error::Result;
use crate::key::{KeyFilter, QueryKey};

impl QueryClient {
    /// Run a write. On success every entry matched by `targets` is marked
    /// stale, whatever parameters produced it.
    pub async fn mutate<T, E, Fut>(&self, targets: &[KeyFilter], mutation: Fut) -> std::result::Result<T, E>
    where
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        let outcome = mutation.await;
        if outcome.is_ok() {
            for filter in targets {
                self.invalidate_queries(filter);
            }
        }
        outcome
    }

    /// Run a write that is reflected in `key` before the server answers.
    ///
    /// Fetches running for `key` are cancelled first so they cannot
    /// overwrite the optimistic value. On success the server response
    /// replaces it; on failure the previous value is restored exactly.
    /// `settle` is invalidated either way.
    pub async fn mutate_optimistic<T, R, E, U, Fut>(
        &self,
        key: &QueryKey,
        settle: &KeyFilter,
        update: U,
        mutation: Fut,
    ) -> std::result::Result<R, E>
    where
        T: Serialize + DeserializeOwned,
        R: Serialize,
        U: FnOnce(Option<T>) -> Option<T>,
        Fut: Future<Output = std::result::Result<R, E>>,
    {
        self.cancel_queries(&KeyFilter::Exact(key.clone()));

        let snapshot = self.get_query_value(key);
        let current: Option<T> = self.get_query_data(key);
        if let Some(optimistic) = update(current) {
            if let Err(err) = self.set_query_data(key.clone(), &optimistic) {
                warn!(%key, error = %err, "optimistic value could not be cached");
            }
        }

        let outcome = mutation.await;
        match &outcome {
            Ok(response) => {
                if let Err(err) = self.set_query_data(key.clone(), response) {
                    warn!(%key, error = %err, "mutation response could not be cached");
                }
            }
            Err(_) => {
                debug!(%key, "mutation failed, rolling back optimistic value");
                self.restore_query_value(key.clone(), snapshot);
            }
        }

        self.invalidate_queries(settle);
        outcome
    }

    /// Seed `key` from a response other than its own fetch.
    pub fn prime_query<T: Serialize>(&self, key: QueryKey, data: &T) -> Result<()> {
        debug!(%key, "priming cache");
        self.set_query_data(key, data)
    }
}
