//! Authenticated HTTP client for the Smart Energy admin backend.
//!
//! Every request goes through one pipeline:
//!
//! 1. the current access token is read from [`SessionStorage`] and attached as
//!    `Authorization: Bearer <token>`;
//! 2. a response carrying the auth-failure signal (`{"error": "invalid token"}`)
//!    triggers a token refresh through [`RefreshCoordinator`], which lets only
//!    one refresh call reach the backend no matter how many requests failed
//!    at once;
//! 3. the failed request is replayed exactly once with the new token. A second
//!    auth failure, a missing refresh token, or a rejected refresh ends the
//!    session: storage is cleared and the [`SessionExpiryHandler`] is told to
//!    send the user back to the login entry point.
//!
//! Network failures and ordinary HTTP errors are surfaced unchanged and never
//! retried here.
//!
//! [`SessionStorage`]: session_store::SessionStorage

pub mod client;
pub mod config;
pub mod error;
pub mod expiry;
pub mod headers;
pub mod refresh;
pub mod request;
pub mod signal;
pub mod transport;
pub mod url;

pub use client::{AdminApiClient, ApiResponse};
pub use config::AdminApiConfig;
pub use error::{AdminApiError, SessionExpiredReason};
pub use expiry::{LogExpiryHandler, SessionExpiryHandler};
pub use refresh::{RefreshCoordinator, RefreshFailure};
pub use request::{PipelineRequest, RequestAttempt, RequestOptions, RequestSpec};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use url::endpoint_url;

pub use reqwest::{Method, StatusCode};
