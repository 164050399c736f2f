//! Endpoint wrappers, one module per API area.
//!
//! These are plain request/response calls with no caching; the cached
//! reads and notifying writes live in [`crate::app`].

mod auth;
mod blogs;
mod dashboard;
mod faqs;
mod inquiries;
mod notices;
mod profile;
mod templates;
mod uploads;

use std::sync::Arc;

use crate::http::HttpClient;
use crate::session::SessionContext;

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Arc<HttpClient>,
}

impl ApiClient {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http: Arc::new(http),
        }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn session(&self) -> &SessionContext {
        self.http.session()
    }
}

fn page_query(page: u32, size: u32) -> Vec<(&'static str, String)> {
    vec![("page", page.to_string()), ("size", size.to_string())]
}
