use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

use crate::key::QueryKey;

/// Failure of a cached read.
///
/// `Clone` so that every caller joined on a de-duplicated fetch receives the
/// same error.
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// The query needs an identifier that was not supplied. A caller bug,
    /// never the result of a request.
    #[error("Query {0} requires an identifier")]
    MissingId(QueryKey),

    #[error("{0}")]
    Fetch(Arc<dyn StdError + Send + Sync>),

    /// A fetch failure that repeating cannot fix, such as an expired session.
    #[error("{0}")]
    Rejected(Arc<dyn StdError + Send + Sync>),

    #[error("Query {0} was cancelled")]
    Cancelled(QueryKey),

    #[error("Cached data could not be converted: {0}")]
    Serde(Arc<serde_json::Error>),

    #[error("Fetch task failed: {0}")]
    Task(String),
}

impl QueryError {
    pub fn fetch<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Fetch(Arc::new(err))
    }

    pub fn rejected<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Rejected(Arc::new(err))
    }

    /// Borrow the original fetch error as a concrete type.
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            Self::Fetch(inner) | Self::Rejected(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    /// Only failed requests are worth repeating.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use blogpilot_core::Resource;

    #[derive(Debug, Error)]
    #[error("boom {0}")]
    struct Boom(u16);

    #[test]
    fn test_downcast_fetch_error() {
        let err = QueryError::fetch(Boom(503));
        assert_eq!(err.to_string(), "boom 503");
        assert_eq!(err.downcast_ref::<Boom>().map(|b| b.0), Some(503));
        assert!(err.is_retryable());

        let cancelled = QueryError::Cancelled(QueryKey::new(Resource::Profile, "me"));
        assert!(cancelled.downcast_ref::<Boom>().is_none());
        assert!(!cancelled.is_retryable());

        let rejected = QueryError::rejected(Boom(401));
        assert_eq!(rejected.downcast_ref::<Boom>().map(|b| b.0), Some(401));
        assert!(!rejected.is_retryable());
    }
}
