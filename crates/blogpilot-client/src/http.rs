//! HTTP transport for the dashboard API.
//!
//! Every request carries the session's bearer token when one exists.
//! Transient failures are retried with exponential backoff. A 401 outside
//! the auth endpoints triggers one refresh-token exchange and one replay of
//! the request; if that does not work the session is expired centrally so
//! call sites never handle it themselves.

use backon::{ExponentialBuilder, Retryable};
use blogpilot_core::models::{RefreshRequest, RefreshResponse};
use blogpilot_core::{ApiErrorBody, SessionEvent};
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, HttpConfig};
use crate::error::{ClientError, Result};
use crate::session::SessionContext;

const AUTH_PREFIX: &str = "/api/auth/";
const REFRESH_PATH: &str = "/api/auth/refresh";

pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
    config: HttpConfig,
    timeout: Duration,
    session: SessionContext,
    refresh_lock: Mutex<()>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig, session: SessionContext) -> Result<Self> {
        let base_url = config.base_url().map_err(ClientError::Config)?;
        let timeout = config.timeout();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            config: config.http.clone(),
            timeout,
            session,
            refresh_lock: Mutex::new(()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        self.send(Method::GET, path, query, None).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, path, &[], Some(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.send(Method::PUT, path, &[], Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(Method::DELETE, path, &[], None).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<T> {
        let url = self.url(path);
        let token = self.session.access_token().await;

        let raw = match self
            .execute_with_retry(&method, &url, query, body.as_ref(), token.as_deref())
            .await
        {
            Err(ClientError::Http { status: 401, .. }) if !path.starts_with(AUTH_PREFIX) => {
                let refreshed = match self.refresh_access_token(token.as_deref()).await {
                    Ok(refreshed) => refreshed,
                    Err(err) => {
                        warn!(%method, path, error = %err, "token refresh failed");
                        self.session.expire().await;
                        return Err(ClientError::SessionExpired);
                    }
                };
                match self
                    .execute_with_retry(&method, &url, query, body.as_ref(), Some(&refreshed))
                    .await
                {
                    Err(ClientError::Http { status: 401, .. }) => {
                        warn!(%method, path, "request rejected after token refresh");
                        self.session.expire().await;
                        return Err(ClientError::SessionExpired);
                    }
                    other => other?,
                }
            }
            other => other?,
        };
        decode_body(&raw)
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(self.config.retry_min_delay_ms))
            .with_max_delay(Duration::from_millis(self.config.retry_max_delay_ms))
            .with_factor(2.0)
            .with_max_times(self.config.retry_limit)
    }

    fn should_retry(&self, err: &ClientError) -> bool {
        match err {
            ClientError::Http { status, .. } => self.config.is_retryable_status(*status),
            ClientError::Timeout(_) | ClientError::Network(_) => true,
            _ => false,
        }
    }

    async fn execute_with_retry(
        &self,
        method: &Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<String> {
        (|| self.execute_once(method, url, query, body, token))
            .retry(self.backoff())
            .when(|e: &ClientError| self.should_retry(e))
            .notify(|e: &ClientError, dur: Duration| {
                warn!(
                    %method,
                    url,
                    "request failed, retrying after {:.2}s: {}",
                    dur.as_secs_f64(),
                    e
                );
            })
            .await
    }

    async fn execute_once(
        &self,
        method: &Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<String> {
        let mut req = self
            .http
            .request(method.clone(), url)
            .header(ACCEPT, "application/json");
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let started = Instant::now();
        let resp = req
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(e, self.timeout))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ClientError::from_reqwest(e, self.timeout))?;
        debug!(
            %method,
            url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );

        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
                body: ApiErrorBody::from_body(&text),
            });
        }
        Ok(text)
    }

    /// Exchange the refresh token for a new access token. Concurrent 401s
    /// share one exchange: a caller that finds the token already replaced
    /// uses the new one.
    async fn refresh_access_token(&self, stale: Option<&str>) -> Result<String> {
        let _guard = self.refresh_lock.lock().await;
        if let Some(current) = self.session.access_token().await
            && Some(current.as_str()) != stale
        {
            debug!("access token already refreshed");
            return Ok(current);
        }

        let refresh_token = self
            .session
            .refresh_token()
            .await
            .ok_or(ClientError::SessionExpired)?;
        let body = serde_json::to_value(RefreshRequest { refresh_token })?;
        let raw = self
            .execute_once(&Method::POST, &self.url(REFRESH_PATH), &[], Some(&body), None)
            .await?;
        let resp: RefreshResponse = decode_body(&raw)?;

        self.session
            .update_access_token(resp.access_token.clone())
            .await?;
        self.session.events().send_session(SessionEvent::Refreshed);
        info!("access token refreshed");
        Ok(resp.access_token)
    }

    /// Upload raw bytes to a presigned object URL. No bearer token and no
    /// retry: the URL is single-use and foreign to the API.
    pub async fn put_presigned(&self, url: &str, content_type: &str, bytes: Vec<u8>) -> Result<()> {
        let resp = self
            .http
            .put(url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(e, self.timeout))?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                body: ApiErrorBody::from_body(&text),
            });
        }
        debug!(status = status.as_u16(), "presigned upload completed");
        Ok(())
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Decode a success body. Empty bodies decode as `null`, or as `{}` for
/// acknowledgement types with all-default fields.
fn decode_body<T: DeserializeOwned>(raw: &str) -> Result<T> {
    if raw.trim().is_empty() {
        return serde_json::from_value(Value::Null)
            .or_else(|_| serde_json::from_value(Value::Object(Map::new())))
            .map_err(|e| ClientError::Decode(format!("empty response body: {e}")));
    }
    serde_json::from_str(raw).map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogpilot_core::models::MessageResponse;

    #[test]
    fn test_decode_empty_body() {
        decode_body::<()>("").unwrap();
        let ack: MessageResponse = decode_body("  ").unwrap();
        assert_eq!(ack.message, None);
        let opt: Option<i64> = decode_body("").unwrap();
        assert_eq!(opt, None);
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        let err = decode_body::<MessageResponse>("[1,2]").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
