use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shown when the server sent a JSON error body without `message` or `error`.
pub const FALLBACK_REQUEST_FAILED: &str = "요청 처리 중 오류가 발생했습니다.";

/// Shown when an error response had no body or the body was not JSON.
pub const FALLBACK_COMMUNICATION_FAILED: &str = "서버와의 통신 중 오류가 발생했습니다.";

/// Shown for errors that carry no usable message at all.
pub const FALLBACK_UNKNOWN: &str = "알 수 없는 오류가 발생했습니다.";

/// Core error types shared by the BlogPilot crates
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unknown resource namespace: {0}")]
    UnknownResource(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Create a new InvalidValue error
    pub fn invalid_value(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownResource(_) | Self::InvalidValue { .. } | Self::Validation(_) => {
                ErrorCategory::Validation
            }
            Self::JsonError(_) => ErrorCategory::Serialization,
        }
    }
}

/// Client-side validation failure, raised before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Error categories, following the error taxonomy of the dashboard client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connection failures and timeouts
    Network,
    /// Non-2xx responses, with or without a parseable body
    Http,
    /// Rejected before the request was sent
    Validation,
    /// The session could not be refreshed
    SessionExpired,
    Serialization,
    System,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Http => write!(f, "http"),
            Self::Validation => write!(f, "validation"),
            Self::SessionExpired => write!(f, "session_expired"),
            Self::Serialization => write!(f, "serialization"),
            Self::System => write!(f, "system"),
        }
    }
}

/// Error body returned by the API on non-2xx responses.
///
/// Both fields are optional because the backend is not consistent about
/// which one it fills. `parsed` records whether a JSON body was present at
/// all, which decides the fallback message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub parsed: bool,
}

impl ApiErrorBody {
    /// Parse a raw response body. Never fails: an empty or non-JSON body
    /// yields an unparsed, empty value.
    pub fn from_body(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Object(map)) => Self {
                message: non_blank(map.get("message")),
                error: non_blank(map.get("error")),
                parsed: true,
            },
            Ok(_) => Self {
                parsed: true,
                ..Self::default()
            },
            Err(_) => Self::default(),
        }
    }

    /// Human-readable message for notifications: `message`, then `error`,
    /// then a fallback depending on whether a body could be parsed.
    pub fn user_message(&self) -> String {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| {
                if self.parsed {
                    FALLBACK_REQUEST_FAILED.to_string()
                } else {
                    FALLBACK_COMMUNICATION_FAILED.to_string()
                }
            })
    }
}

fn non_blank(value: Option<&serde_json::Value>) -> Option<String> {
    value
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_preferred_over_error() {
        let body = ApiErrorBody::from_body(r#"{"message":"중복된 이메일","error":"Conflict"}"#);
        assert!(body.parsed);
        assert_eq!(body.user_message(), "중복된 이메일");
    }

    #[test]
    fn test_error_field_used_when_message_missing() {
        let body = ApiErrorBody::from_body(r#"{"error":"Bad Request"}"#);
        assert_eq!(body.user_message(), "Bad Request");
    }

    #[test]
    fn test_blank_message_falls_through() {
        let body = ApiErrorBody::from_body(r#"{"message":"   ","error":"Forbidden"}"#);
        assert_eq!(body.user_message(), "Forbidden");
    }

    #[test]
    fn test_parsed_body_without_fields() {
        let body = ApiErrorBody::from_body(r#"{"status":500}"#);
        assert!(body.parsed);
        assert_eq!(body.user_message(), FALLBACK_REQUEST_FAILED);
    }

    #[test]
    fn test_unparseable_and_empty_bodies() {
        for raw in ["", "<html>502 Bad Gateway</html>", "   "] {
            let body = ApiErrorBody::from_body(raw);
            assert!(!body.parsed);
            assert_eq!(body.user_message(), FALLBACK_COMMUNICATION_FAILED);
        }
    }

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::SessionExpired.to_string(), "session_expired");
        let err = CoreError::invalid_value("status", "DONE");
        assert_eq!(err.to_string(), "Invalid value for status: DONE");
        assert_eq!(err.category(), ErrorCategory::Validation);
    }
}
