use std::path::PathBuf;

use admin_api::AdminApiError;
use session_store::SessionStoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid timeout '{value}': expected a whole number of seconds")]
    InvalidTimeout { value: String },

    #[error("no session path configured and HOME is not set")]
    NoHomeDirectory,
}

#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Api(#[from] AdminApiError),

    #[error(transparent)]
    Session(#[from] SessionStoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A request body could not be encoded or a response did not have the
    /// expected shape.
    #[error("unexpected JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// No stored session carries a signed-in admin.
    #[error("not signed in; run `login` first")]
    NotAuthenticated,

    #[error("login response did not include {0}")]
    IncompleteLogin(&'static str),
}

impl AdminError {
    /// True when the call ended the session and the user must sign in again.
    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::Api(error) if error.is_session_expired())
            || matches!(self, Self::NotAuthenticated)
    }
}
