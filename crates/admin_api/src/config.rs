use std::collections::BTreeMap;
use std::time::Duration;

use crate::signal::INVALID_TOKEN_MARKER;
use crate::url::DEFAULT_BASE_URL;

/// Login entry point the user is sent to when the session cannot be recovered.
pub const DEFAULT_LOGIN_PATH: &str = "/login";
/// Endpoint exchanging a refresh token for a new access token.
pub const DEFAULT_REFRESH_PATH: &str = "admin-refresh-token";

/// Transport configuration for admin API requests.
#[derive(Debug, Clone)]
pub struct AdminApiConfig {
    /// Base URL every resource path is joined onto.
    pub base_url: String,
    /// Path of the refresh endpoint, relative to `base_url`.
    pub refresh_path: String,
    /// Where the expiry handler is told to send the user.
    pub login_path: String,
    /// Exact `error` string that marks a rejected access token.
    pub auth_failure_marker: String,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Additional headers merged into every request.
    pub extra_headers: BTreeMap<String, String>,
    /// Optional whole-request timeout.
    pub timeout: Option<Duration>,
}

impl Default for AdminApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            auth_failure_marker: INVALID_TOKEN_MARKER.to_string(),
            user_agent: None,
            extra_headers: BTreeMap::new(),
            timeout: None,
        }
    }
}

impl AdminApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_refresh_path(mut self, refresh_path: impl Into<String>) -> Self {
        self.refresh_path = refresh_path.into();
        self
    }

    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    pub fn with_auth_failure_marker(mut self, marker: impl Into<String>) -> Self {
        self.auth_failure_marker = marker.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn insert_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.extra_headers.extend(headers);
        self
    }
}
