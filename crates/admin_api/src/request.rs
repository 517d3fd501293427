use std::collections::BTreeMap;
use std::fmt::Display;
use std::time::Duration;

use reqwest::Method;
use serde_json::Value;

/// Per-call knobs layered on top of the client configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub headers: BTreeMap<String, String>,
    pub query: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// What the caller asked for; never mutated by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub id: Option<String>,
    pub body: Option<Value>,
    pub options: RequestOptions,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            id: None,
            body: None,
            options: RequestOptions::default(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Display) -> Self {
        self.id = Some(id.to_string());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAttempt {
    /// First send.
    Initial,
    /// Sent again after a token refresh. A second auth failure is terminal.
    Replay,
}

/// A request travelling through the pipeline together with its attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRequest {
    pub attempt: RequestAttempt,
    pub original: RequestSpec,
}

impl PipelineRequest {
    #[must_use]
    pub fn initial(original: RequestSpec) -> Self {
        Self {
            attempt: RequestAttempt::Initial,
            original,
        }
    }

    #[must_use]
    pub fn into_replay(self) -> Self {
        Self {
            attempt: RequestAttempt::Replay,
            original: self.original,
        }
    }

    #[must_use]
    pub fn is_replay(&self) -> bool {
        self.attempt == RequestAttempt::Replay
    }
}
