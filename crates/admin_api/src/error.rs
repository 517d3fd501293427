use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use session_store::SessionStoreError;
use thiserror::Error;

/// Why the pipeline gave up on the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionExpiredReason {
    /// An auth failure arrived and no refresh token was stored.
    MissingRefreshToken,
    /// The refresh endpoint failed or answered without a token.
    RefreshRejected(String),
    /// The request was replayed with a fresh token and rejected again.
    ReplayRejected,
}

impl fmt::Display for SessionExpiredReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRefreshToken => write!(f, "no refresh token is stored"),
            Self::RefreshRejected(message) => write!(f, "token refresh failed: {message}"),
            Self::ReplayRejected => write!(f, "refreshed access token was rejected"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AdminApiError {
    /// The transport could not complete the exchange. Callers may retry.
    #[error("network error: {message}")]
    Network { message: String, timed_out: bool },

    /// Non-2xx response that is not the auth-failure signal.
    #[error("HTTP {status} {message}")]
    Http {
        status: StatusCode,
        message: String,
        body: String,
    },

    /// The session was cleared and the expiry handler already notified.
    #[error("session expired: {0}")]
    SessionExpired(SessionExpiredReason),

    #[error("failed to decode {status} response body: {source}")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("failed to build HTTP client: {0}")]
    ClientInit(String),

    #[error(transparent)]
    Session(#[from] SessionStoreError),
}

impl AdminApiError {
    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired(_))
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } | Self::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn http(status: StatusCode, body: String) -> Self {
        Self::Http {
            status,
            message: parse_error_message(status, &body),
            body,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    message: Option<String>,
    error: Option<Value>,
    #[serde(alias = "Description")]
    description: Option<String>,
}

/// Human-readable message for an error response.
///
/// Preference order: `message`, `error` (string or `{message}`),
/// `description`, the raw body, then the canonical status reason.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) {
        let from_error = payload.error.as_ref().and_then(|value| match value {
            Value::String(text) => Some(text.clone()),
            Value::Object(fields) => fields
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned),
            _ => None,
        });

        if let Some(message) = payload
            .message
            .or(from_error)
            .or(payload.description)
            .filter(|message| !message.trim().is_empty())
        {
            return message;
        }
    }

    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}
