use blogpilot_core::error::{FALLBACK_COMMUNICATION_FAILED, FALLBACK_UNKNOWN};
use blogpilot_core::{ApiErrorBody, ErrorCategory, ValidationError};
use blogpilot_query::QueryError;
use std::time::Duration;
use thiserror::Error;

pub const TIMEOUT_MESSAGE: &str = "요청 시간이 초과되었습니다.";
pub const SESSION_EXPIRED_MESSAGE: &str = "세션이 만료되었습니다. 다시 로그인해주세요.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {status}: {}", body.user_message())]
    Http { status: u16, body: ApiErrorBody },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Session expired")]
    SessionExpired,

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Query(QueryError),
}

impl ClientError {
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Network(err)
        }
    }

    /// The error a cached read failed with, unwrapped from the cache layer
    /// when it came from a request.
    pub fn root(&self) -> &ClientError {
        match self {
            Self::Query(inner) => inner.downcast_ref::<ClientError>().unwrap_or(self),
            other => other,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self.root() {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self.root(), Self::SessionExpired)
    }

    /// Single human-readable message for notifications and inline errors.
    pub fn user_message(&self) -> String {
        match self.root() {
            Self::Http { body, .. } => body.user_message(),
            Self::Network(_) => FALLBACK_COMMUNICATION_FAILED.to_string(),
            Self::Timeout(_) => TIMEOUT_MESSAGE.to_string(),
            Self::Validation(err) => err.message.clone(),
            Self::SessionExpired => SESSION_EXPIRED_MESSAGE.to_string(),
            Self::Query(QueryError::Cancelled(_)) => FALLBACK_UNKNOWN.to_string(),
            other => {
                let message = other.to_string();
                if message.trim().is_empty() {
                    FALLBACK_UNKNOWN.to_string()
                } else {
                    message
                }
            }
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.root() {
            Self::Network(_) | Self::Timeout(_) => ErrorCategory::Network,
            Self::Http { .. } => ErrorCategory::Http,
            Self::Validation(_) => ErrorCategory::Validation,
            Self::SessionExpired => ErrorCategory::SessionExpired,
            Self::Decode(_) => ErrorCategory::Serialization,
            Self::Query(QueryError::MissingId(_)) => ErrorCategory::Validation,
            Self::Storage(_) | Self::Config(_) | Self::Query(_) => ErrorCategory::System,
        }
    }
}

impl From<QueryError> for ClientError {
    fn from(err: QueryError) -> Self {
        Self::Query(err)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use blogpilot_core::Resource;
    use blogpilot_core::error::FALLBACK_REQUEST_FAILED;
    use blogpilot_query::QueryKey;

    fn http(status: u16, raw: &str) -> ClientError {
        ClientError::Http {
            status,
            body: ApiErrorBody::from_body(raw),
        }
    }

    #[test]
    fn test_user_message_per_category() {
        assert_eq!(http(409, r#"{"message":"이미 가입된 이메일입니다."}"#).user_message(), "이미 가입된 이메일입니다.");
        assert_eq!(http(500, "{}").user_message(), FALLBACK_REQUEST_FAILED);
        assert_eq!(http(502, "Bad Gateway").user_message(), FALLBACK_COMMUNICATION_FAILED);
        assert_eq!(
            ClientError::Validation(ValidationError::new("title", "제목을 입력해주세요.")).user_message(),
            "제목을 입력해주세요."
        );
        assert_eq!(ClientError::SessionExpired.user_message(), SESSION_EXPIRED_MESSAGE);
    }

    #[test]
    fn test_errors_seen_through_cache_layer() {
        let wrapped = ClientError::from(QueryError::fetch(http(404, "")));
        assert!(wrapped.is_not_found());
        assert_eq!(wrapped.category(), ErrorCategory::Http);
        assert_eq!(wrapped.user_message(), FALLBACK_COMMUNICATION_FAILED);

        let missing = ClientError::from(QueryError::MissingId(QueryKey::new(Resource::Notices, "detail")));
        assert!(!missing.is_not_found());
        assert_eq!(missing.category(), ErrorCategory::Validation);
    }
}
