//! Query cache for the BlogPilot client.
//!
//! Read results are cached per [`QueryKey`] in a process-wide
//! [`QueryClient`]. Keys carry the resource namespace explicitly, so a
//! mutation can invalidate everything under a resource with a
//! [`KeyFilter`] instead of matching key prefixes.

pub mod cache;
pub mod error;
pub mod key;
pub mod keys;
pub mod mutation;
pub mod observer;
pub mod options;
pub mod pagination;

pub use cache::{CacheEvent, EntrySnapshot, QueryClient};
pub use error::{QueryError, Result};
pub use key::{KeyFilter, KeyParam, QueryKey};
pub use observer::{QueryDef, QueryObserver, QueryState, QueryStatus};
pub use options::{QueryOptions, RetryPolicy};
pub use pagination::PageState;
