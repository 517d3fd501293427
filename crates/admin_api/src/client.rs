use std::fmt::Display;
use std::sync::Arc;

use log::{debug, error, info, warn};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use session_store::SessionStorage;
use uuid::Uuid;

use crate::config::AdminApiConfig;
use crate::error::{parse_error_message, AdminApiError, SessionExpiredReason};
use crate::expiry::{LogExpiryHandler, SessionExpiryHandler};
use crate::headers::build_headers;
use crate::refresh::{RefreshCoordinator, RefreshFailure};
use crate::request::{PipelineRequest, RequestAttempt, RequestOptions, RequestSpec};
use crate::signal::{classify, ResponseClass};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use crate::url::endpoint_url;

/// Decoded 2xx response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> T {
        self.data
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: Option<String>,
}

pub struct AdminApiClient {
    config: AdminApiConfig,
    transport: Arc<dyn HttpTransport>,
    session: Arc<dyn SessionStorage>,
    expiry: Arc<dyn SessionExpiryHandler>,
    refresh: Arc<RefreshCoordinator>,
}

impl AdminApiClient {
    /// Client over the production `reqwest` transport.
    pub fn new(
        config: AdminApiConfig,
        session: Arc<dyn SessionStorage>,
    ) -> Result<Self, AdminApiError> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout)?);
        Ok(Self::with_transport(config, session, transport))
    }

    pub fn with_transport(
        config: AdminApiConfig,
        session: Arc<dyn SessionStorage>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            config,
            transport,
            session,
            expiry: Arc::new(LogExpiryHandler),
            refresh: Arc::new(RefreshCoordinator::new()),
        }
    }

    #[must_use]
    pub fn with_expiry_handler(mut self, handler: Arc<dyn SessionExpiryHandler>) -> Self {
        self.expiry = handler;
        self
    }

    pub fn config(&self) -> &AdminApiConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<dyn SessionStorage> {
        &self.session
    }

    pub fn refresh_coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.refresh
    }

    /// `GET {path}?{query}`
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResponse<T>, AdminApiError> {
        let mut options = RequestOptions::default();
        for (key, value) in query {
            options = options.with_query(*key, value);
        }
        self.execute(RequestSpec::new(Method::GET, path).with_options(options))
            .await
    }

    /// `GET {path}/{id}`
    pub async fn get_one<T: DeserializeOwned>(
        &self,
        path: &str,
        id: impl Display,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>, AdminApiError> {
        self.execute(
            RequestSpec::new(Method::GET, path)
                .with_id(id)
                .with_options(options),
        )
        .await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>, AdminApiError> {
        self.execute(
            RequestSpec::new(Method::POST, path)
                .with_body(body)
                .with_options(options),
        )
        .await
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>, AdminApiError> {
        self.execute(
            RequestSpec::new(Method::PATCH, path)
                .with_body(body)
                .with_options(options),
        )
        .await
    }

    /// `PUT {path}/{id}`
    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        id: impl Display,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>, AdminApiError> {
        self.execute(
            RequestSpec::new(Method::PUT, path)
                .with_id(id)
                .with_body(body)
                .with_options(options),
        )
        .await
    }

    /// `PUT {path}`; the backend reads the id from the body.
    pub async fn put_without_id<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>, AdminApiError> {
        self.execute(
            RequestSpec::new(Method::PUT, path)
                .with_body(body)
                .with_options(options),
        )
        .await
    }

    /// `DELETE {path}/{id}`
    pub async fn remove<T: DeserializeOwned>(
        &self,
        path: &str,
        id: impl Display,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>, AdminApiError> {
        self.execute(
            RequestSpec::new(Method::DELETE, path)
                .with_id(id)
                .with_options(options),
        )
        .await
    }

    /// Send `spec` through the authenticated pipeline and decode the body.
    ///
    /// An empty 2xx body decodes as JSON `null`.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        spec: RequestSpec,
    ) -> Result<ApiResponse<T>, AdminApiError> {
        let response = self.dispatch(spec).await?;
        let body = if response.body.trim().is_empty() {
            "null"
        } else {
            response.body.as_str()
        };
        let data = serde_json::from_str(body).map_err(|source| AdminApiError::Decode {
            status: response.status,
            source,
        })?;
        Ok(ApiResponse {
            status: response.status,
            data,
        })
    }

    async fn dispatch(&self, spec: RequestSpec) -> Result<HttpResponse, AdminApiError> {
        let request_id = Uuid::new_v4();
        let mut request = PipelineRequest::initial(spec);
        let mut replay_token: Option<String> = None;

        loop {
            let http = self.build_http_request(&request, replay_token.as_deref())?;
            let sent_token = http.bearer_token().map(str::to_owned);
            debug!(
                "[{request_id}] {} {} ({:?})",
                http.method, request.original.path, request.attempt
            );

            let response = self.transport.send(http).await.map_err(|error| {
                warn!("[{request_id}] transport failed: {error}");
                AdminApiError::from(error)
            })?;

            match (
                classify(&response, &self.config.auth_failure_marker),
                request.attempt,
            ) {
                (ResponseClass::Success, _) => return Ok(response),
                (ResponseClass::Failure, _) => {
                    debug!("[{request_id}] HTTP {}", response.status);
                    return Err(AdminApiError::http(response.status, response.body));
                }
                (ResponseClass::AuthFailure, RequestAttempt::Replay) => {
                    warn!("[{request_id}] replay rejected with a fresh token");
                    return Err(self.expire_session(SessionExpiredReason::ReplayRejected));
                }
                (ResponseClass::AuthFailure, RequestAttempt::Initial) => {
                    debug!("[{request_id}] access token rejected");
                    request = request.into_replay();
                    replay_token = Some(self.recover_access_token(sent_token.as_deref()).await?);
                }
            }
        }
    }

    /// Request interceptor: attach the stored access token unless a replay
    /// carries the token handed over by the refresh.
    fn build_http_request(
        &self,
        request: &PipelineRequest,
        replay_token: Option<&str>,
    ) -> Result<HttpRequest, AdminApiError> {
        let spec = &request.original;
        let url = endpoint_url(
            &self.config.base_url,
            &spec.path,
            spec.id.as_deref(),
            &spec.options.query,
        )?;

        let stored;
        let token = match replay_token {
            Some(token) => Some(token),
            None => {
                stored = self.session.access_token()?;
                stored.as_deref()
            }
        };

        let headers = build_headers(
            &self.config,
            &spec.options.headers,
            spec.body.is_some(),
            token,
        )?;

        Ok(HttpRequest {
            method: spec.method.clone(),
            url,
            headers,
            body: spec.body.clone(),
            timeout: spec.options.timeout,
        })
    }

    /// Obtain a token to replay with after an auth failure.
    async fn recover_access_token(&self, sent_token: Option<&str>) -> Result<String, AdminApiError> {
        let Some(refresh_token) = self.session.refresh_token()? else {
            return Err(self.expire_session(SessionExpiredReason::MissingRefreshToken));
        };

        // A refresh already landed after this request was sent.
        if let Some(current) = self.session.access_token()? {
            if sent_token != Some(current.as_str()) {
                debug!("access token rotated since send; replaying without refresh");
                return Ok(current);
            }
        }

        loop {
            let refresh_token = refresh_token.clone();
            match self
                .refresh
                .acquire_or_wait(|| self.refresh_access_token(refresh_token))
                .await
            {
                Ok(token) => return Ok(token),
                Err(RefreshFailure::Abandoned) => {
                    debug!("refresh leader went away before settling; trying again");
                }
                Err(RefreshFailure::Rejected(message)) => {
                    return Err(AdminApiError::SessionExpired(
                        SessionExpiredReason::RefreshRejected(message),
                    ));
                }
            }
        }
    }

    /// Leader-only: call the refresh endpoint and apply the outcome.
    async fn refresh_access_token(&self, refresh_token: String) -> Result<String, RefreshFailure> {
        info!("refreshing access token");
        match self.request_new_access_token(&refresh_token).await {
            Ok(token) => {
                if let Err(error) = self.session.set_access_token(&token) {
                    warn!("failed to persist refreshed access token: {error}");
                }
                info!("access token refreshed");
                Ok(token)
            }
            Err(message) => {
                self.expire_session(SessionExpiredReason::RefreshRejected(message.clone()));
                Err(RefreshFailure::Rejected(message))
            }
        }
    }

    async fn request_new_access_token(&self, refresh_token: &str) -> Result<String, String> {
        let url = endpoint_url(&self.config.base_url, &self.config.refresh_path, None, &[])
            .map_err(|error| error.to_string())?;
        let body = json!({ "refresh_token": refresh_token });
        let headers = build_headers(&self.config, &Default::default(), true, None)
            .map_err(|error| error.to_string())?;

        let response = self
            .transport
            .send(HttpRequest {
                method: Method::POST,
                url,
                headers,
                body: Some(body),
                timeout: None,
            })
            .await
            .map_err(|error| error.to_string())?;

        if !response.status.is_success() {
            return Err(format!(
                "HTTP {} {}",
                response.status,
                parse_error_message(response.status, &response.body)
            ));
        }

        serde_json::from_str::<RefreshResponse>(&response.body)
            .ok()
            .and_then(|payload| payload.access_token)
            .map(|token| token.trim().to_owned())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| "refresh response did not include an access_token".to_owned())
    }

    /// Terminal failure: clear storage, notify the handler, build the error.
    fn expire_session(&self, reason: SessionExpiredReason) -> AdminApiError {
        if let Err(error) = self.session.clear() {
            error!("failed to clear session after expiry: {error}");
        }
        self.expiry
            .session_expired(&self.config.login_path, &reason);
        AdminApiError::SessionExpired(reason)
    }
}
