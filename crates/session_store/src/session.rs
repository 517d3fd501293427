use std::fmt;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::SessionStoreError;

pub const SESSION_FORMAT_VERSION: u32 = 1;

/// Credentials and identity of the signed-in admin.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Session {
    pub version: u32,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    /// RFC3339 UTC timestamp of the last write.
    pub saved_at: String,
}

impl Session {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<impl Into<String>>,
        user_id: Option<impl Into<String>>,
    ) -> Result<Self, SessionStoreError> {
        Ok(Self {
            version: SESSION_FORMAT_VERSION,
            access_token: access_token.into(),
            refresh_token: refresh_token.map(Into::into),
            user_id: user_id.map(Into::into),
            saved_at: now_rfc3339()?,
        })
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        non_empty(&self.access_token)
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref().and_then(non_empty)
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref().and_then(non_empty)
    }

    /// Replaces the access token and bumps `saved_at`.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Result<Self, SessionStoreError> {
        self.access_token = token.into();
        self.saved_at = now_rfc3339()?;
        Ok(self)
    }
}

// Tokens are credentials; keep them out of debug output and logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("version", &self.version)
            .field("access_token", &redacted(Some(&self.access_token)))
            .field("refresh_token", &redacted(self.refresh_token.as_deref()))
            .field("user_id", &self.user_id)
            .field("saved_at", &self.saved_at)
            .finish()
    }
}

fn redacted(value: Option<&str>) -> &'static str {
    match value.and_then(non_empty) {
        Some(_) => "<redacted>",
        None => "<empty>",
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

pub(crate) fn now_rfc3339() -> Result<String, SessionStoreError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(SessionStoreError::ClockFormat)
}
