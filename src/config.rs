//! Environment and file configuration.
//!
//! Precedence, later wins: built-in defaults, the JSON file named by
//! `SMART_ENERGY_CONFIG_PATH`, the other `SMART_ENERGY_*` variables, then any
//! explicit overrides applied by the caller (CLI flags).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use admin_api::url::DEFAULT_BASE_URL;
use admin_api::AdminApiConfig;
use serde::Deserialize;
use session_store::session_file_path;

use crate::error::ConfigError;

pub const ENV_API_URL: &str = "SMART_ENERGY_API_URL";
pub const ENV_SESSION_PATH: &str = "SMART_ENERGY_SESSION_PATH";
pub const ENV_TIMEOUT_SEC: &str = "SMART_ENERGY_TIMEOUT_SEC";
pub const ENV_LOG: &str = "SMART_ENERGY_LOG";
pub const ENV_CONFIG_PATH: &str = "SMART_ENERGY_CONFIG_PATH";

pub const DEFAULT_TIMEOUT_SEC: u64 = 30;

/// Raw `SMART_ENERGY_*` values; blank variables count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    pub api_url: Option<String>,
    pub session_path: Option<PathBuf>,
    pub timeout_sec: Option<String>,
    pub log_level: Option<String>,
    pub config_path: Option<PathBuf>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: env_string_opt(ENV_API_URL),
            session_path: env_string_opt(ENV_SESSION_PATH).map(PathBuf::from),
            timeout_sec: env_string_opt(ENV_TIMEOUT_SEC),
            log_level: env_string_opt(ENV_LOG),
            config_path: env_string_opt(ENV_CONFIG_PATH).map(PathBuf::from),
        }
    }
}

/// Contents of the optional JSON config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub session_path: Option<PathBuf>,
    pub timeout_sec: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Fully resolved settings the client is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub session_path: PathBuf,
    /// `None` disables the client-wide timeout (configured as `0`).
    pub timeout: Option<Duration>,
    pub log_level: Option<String>,
}

impl Settings {
    /// `home` locates the default session file when none is configured.
    pub fn resolve(env: &EnvConfig, home: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match &env.config_path {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let api_url = env
            .api_url
            .clone()
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let session_path = match env.session_path.clone().or(file.session_path) {
            Some(path) => path,
            None => session_file_path(home.ok_or(ConfigError::NoHomeDirectory)?),
        };

        let timeout_sec = match &env.timeout_sec {
            Some(raw) => parse_timeout(raw)?,
            None => file.timeout_sec.unwrap_or(DEFAULT_TIMEOUT_SEC),
        };

        Ok(Self {
            api_url,
            session_path,
            timeout: timeout_from_secs(timeout_sec),
            log_level: env.log_level.clone(),
        })
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    #[must_use]
    pub fn with_session_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_path = path.into();
        self
    }

    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = timeout_from_secs(secs);
        self
    }

    pub fn api_config(&self) -> AdminApiConfig {
        let config = AdminApiConfig::new(&self.api_url);
        match self.timeout {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        }
    }
}

fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidTimeout {
            value: raw.to_string(),
        })
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
