use std::collections::BTreeMap;

use reqwest::header::{HeaderName, HeaderValue};

use crate::config::AdminApiConfig;
use crate::error::AdminApiError;

pub const HEADER_ACCEPT: &str = "accept";
pub const HEADER_CONTENT_TYPE: &str = "content-type";
pub const HEADER_AUTHORIZATION: &str = "authorization";
pub const HEADER_USER_AGENT: &str = "user-agent";

const JSON: &str = "application/json";

/// Build the header map for one outgoing request.
///
/// Layering, later wins: defaults, `config.extra_headers`, per-call headers,
/// then `Authorization` when an access token is available.
pub fn build_headers(
    config: &AdminApiConfig,
    per_call: &BTreeMap<String, String>,
    has_body: bool,
    access_token: Option<&str>,
) -> Result<BTreeMap<String, String>, AdminApiError> {
    let mut headers = BTreeMap::new();

    headers.insert(HEADER_ACCEPT.to_owned(), JSON.to_owned());
    if has_body {
        headers.insert(HEADER_CONTENT_TYPE.to_owned(), JSON.to_owned());
    }

    let ua = config
        .user_agent
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(default_user_agent);
    headers.insert(HEADER_USER_AGENT.to_owned(), ua);

    for (key, value) in config.extra_headers.iter().chain(per_call.iter()) {
        headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_owned());
    }

    if let Some(token) = access_token.map(str::trim).filter(|token| !token.is_empty()) {
        headers.insert(HEADER_AUTHORIZATION.to_owned(), format!("Bearer {token}"));
    }

    for (key, value) in &headers {
        HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| AdminApiError::InvalidHeader(format!("invalid header key: {key}")))?;
        HeaderValue::from_str(value)
            .map_err(|_| AdminApiError::InvalidHeader(format!("invalid header value for {key}")))?;
    }

    Ok(headers)
}

#[must_use]
pub fn default_user_agent() -> String {
    format!("smart-energy-admin/{}", env!("CARGO_PKG_VERSION"))
}
