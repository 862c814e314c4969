//! Error types for the brief service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;
use tracing::{error, warn};

/// Primary error type for all brief operations.
#[derive(Error, Debug)]
pub enum BriefError {
    #[error("{0}")]
    Validation(String),

    #[error("403 Forbidden: invalid API key or quota exceeded ({0})")]
    UpstreamForbidden(String),

    #[error("Gemini API error {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Upstream unreachable: {0}")]
    UpstreamUnreachable(#[from] reqwest::Error),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Failed to parse brief: {0}")]
    Parse(String),

    #[error("Failed to render document: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Stable tag for each error variant, carried in stream error events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    UpstreamForbidden,
    UpstreamStatus,
    UpstreamUnreachable,
    Timeout,
    Parse,
    Render,
    Configuration,
}

impl BriefError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::UpstreamForbidden(_) => ErrorKind::UpstreamForbidden,
            Self::UpstreamStatus { .. } => ErrorKind::UpstreamStatus,
            Self::UpstreamUnreachable(_) => ErrorKind::UpstreamUnreachable,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Render(_) => ErrorKind::Render,
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// Upstream HTTP status, when the provider answered with one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::UpstreamForbidden(_) => Some(403),
            Self::UpstreamStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// HTTP status returned to the caller.
    ///
    /// Upstream statuses are passed through; anything that is not a valid
    /// status code becomes `502 Bad Gateway`.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamForbidden(_) => StatusCode::FORBIDDEN,
            Self::UpstreamStatus { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::UpstreamUnreachable(_)
            | Self::Timeout(_)
            | Self::Parse(_)
            | Self::Render(_)
            | Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for BriefError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl IntoResponse for BriefError {
    fn into_response(self) -> Response {
        match self.kind() {
            ErrorKind::Render => error!(error = %self, "document rendering failed"),
            ErrorKind::Validation => {}
            kind => warn!(%kind, error = %self, "request failed"),
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, BriefError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_is_passed_through() {
        let err = BriefError::UpstreamStatus {
            status: 429,
            body: "slow down".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.upstream_status(), Some(429));
        assert_eq!(err.to_string(), "Gemini API error 429: slow down");
    }

    #[test]
    fn invalid_upstream_status_becomes_bad_gateway() {
        let err = BriefError::UpstreamStatus {
            status: 1000,
            body: String::new(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn forbidden_is_distinguished() {
        let err = BriefError::UpstreamForbidden("quota".to_string());
        assert_eq!(err.kind(), ErrorKind::UpstreamForbidden);
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert!(err.to_string().starts_with("403 Forbidden"));
    }

    #[test]
    fn json_errors_map_to_parse() {
        let serde_error = serde_json::from_str::<serde_json::Value>("{not-json}").unwrap_err();
        let err: BriefError = serde_error.into();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn kind_tags_are_snake_case() {
        assert_eq!(ErrorKind::UpstreamForbidden.to_string(), "upstream_forbidden");
        assert_eq!(
            serde_json::to_value(ErrorKind::UpstreamUnreachable).unwrap(),
            serde_json::json!("upstream_unreachable")
        );
    }
}
