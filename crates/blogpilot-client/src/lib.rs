//! Client SDK for the BlogPilot dashboard API.
//!
//! [`BlogPilotClient`] ties together the HTTP layer (bearer auth, retry,
//! one-shot token refresh), the persisted session, the shared query cache
//! and the event bus that carries notifications and session changes.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod queries;
pub mod session;

pub use api::ApiClient;
pub use app::BlogPilotClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use http::HttpClient;
pub use session::{FileSessionStorage, MemorySessionStorage, SessionContext, SessionStorage};
