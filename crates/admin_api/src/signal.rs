use serde::Deserialize;
use serde_json::Value;

use crate::transport::HttpResponse;

/// `error` value the backend uses for a rejected access token.
pub const INVALID_TOKEN_MARKER: &str = "invalid token";

/// How the pipeline treats a received response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    Success,
    /// Access token rejected; eligible for refresh-and-replay.
    AuthFailure,
    Failure,
}

#[derive(Debug, Deserialize)]
struct ErrorField {
    error: Option<Value>,
}

/// True when `body` is a JSON object whose `error` string equals `marker`.
///
/// The match is exact: status codes are ignored and a differently worded
/// message never triggers a refresh.
pub fn is_auth_failure(body: &str, marker: &str) -> bool {
    serde_json::from_str::<ErrorField>(body)
        .ok()
        .and_then(|payload| payload.error)
        .is_some_and(|value| value.as_str() == Some(marker))
}

pub fn classify(response: &HttpResponse, marker: &str) -> ResponseClass {
    if response.status.is_success() {
        ResponseClass::Success
    } else if is_auth_failure(&response.body, marker) {
        ResponseClass::AuthFailure
    } else {
        ResponseClass::Failure
    }
}
