#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use admin_api::{
    AdminApiClient, AdminApiConfig, HttpRequest, HttpResponse, HttpTransport, Method,
    RefreshCoordinator, SessionExpiredReason, SessionExpiryHandler, StatusCode, TransportError,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use session_store::{MemorySessionStore, Session, SessionStorage, SessionStoreError};

pub const BASE_URL: &str = "http://backend.test/api";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

struct BackendState {
    valid_token: String,
    next_token: Option<String>,
    reject_all: bool,
    transport_down: bool,
    routes: HashMap<(Method, String), (u16, String)>,
    requests: Vec<RecordedRequest>,
    refresh_bodies: Vec<Value>,
    hold_refresh: Option<(Arc<RefreshCoordinator>, usize)>,
    stalled_refreshes: usize,
}

/// In-process stand-in for the admin backend.
///
/// Data requests succeed only when they carry `valid_token`; anything else
/// gets `{"error":"invalid token"}`. The refresh endpoint hands out
/// `next_token` (and starts accepting it) or fails when it is `None`.
pub struct FakeBackend {
    state: Mutex<BackendState>,
    refresh_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new(valid_token: &str, next_token: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(BackendState {
                valid_token: valid_token.to_owned(),
                next_token: next_token.map(str::to_owned),
                reject_all: false,
                transport_down: false,
                routes: HashMap::new(),
                requests: Vec::new(),
                refresh_bodies: Vec::new(),
                hold_refresh: None,
                stalled_refreshes: 0,
            }),
            refresh_calls: AtomicUsize::new(0),
        })
    }

    pub fn route(&self, method: Method, path: &str, status: u16, body: &str) {
        self.lock()
            .routes
            .insert((method, path.to_owned()), (status, body.to_owned()));
    }

    pub fn reject_every_token(&self) {
        self.lock().reject_all = true;
    }

    pub fn take_transport_down(&self) {
        self.lock().transport_down = true;
    }

    pub fn rotate(&self, valid_token: &str, next_token: Option<&str>) {
        let mut state = self.lock();
        state.valid_token = valid_token.to_owned();
        state.next_token = next_token.map(str::to_owned);
    }

    /// Keep the refresh call open until `waiters` requests are parked behind it.
    pub fn hold_refresh_until_waiting(&self, coordinator: Arc<RefreshCoordinator>, waiters: usize) {
        self.lock().hold_refresh = Some((coordinator, waiters));
    }

    /// The next refresh call never answers; its caller has to be cancelled.
    pub fn stall_next_refresh(&self) {
        self.lock().stalled_refreshes += 1;
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::Acquire)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    pub fn refresh_bodies(&self) -> Vec<Value> {
        self.lock().refresh_bodies.clone()
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        lock_unpoisoned(&self.state)
    }

    async fn refresh(&self, request: HttpRequest) -> HttpResponse {
        self.refresh_calls.fetch_add(1, Ordering::AcqRel);
        let (hold, stall) = {
            let mut state = self.lock();
            state
                .refresh_bodies
                .push(request.body.clone().unwrap_or(Value::Null));
            let stall = state.stalled_refreshes > 0;
            if stall {
                state.stalled_refreshes -= 1;
            }
            (state.hold_refresh.take(), stall)
        };

        if stall {
            std::future::pending::<()>().await;
        }

        if let Some((coordinator, waiters)) = hold {
            let parked = tokio::time::timeout(Duration::from_secs(5), async {
                while coordinator.waiting() < waiters {
                    tokio::time::sleep(Duration::from_millis(2)).await;
                }
            })
            .await;
            assert!(parked.is_ok(), "expected {waiters} parked requests");
        }

        let mut state = self.lock();
        match state.next_token.clone() {
            Some(token) => {
                state.valid_token = token.clone();
                HttpResponse::new(
                    StatusCode::OK,
                    json!({ "access_token": token }).to_string(),
                )
            }
            None => HttpResponse::new(
                StatusCode::UNAUTHORIZED,
                r#"{"error":"refresh token expired"}"#,
            ),
        }
    }
}

#[async_trait]
impl HttpTransport for FakeBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if self.lock().transport_down {
            return Err(TransportError::new("connection refused"));
        }

        let path = request
            .url
            .path()
            .trim_start_matches("/api")
            .to_owned();
        if path == "/admin-refresh-token" {
            return Ok(self.refresh(request).await);
        }

        let mut state = self.lock();
        let bearer = request.bearer_token().map(str::to_owned);
        state.requests.push(RecordedRequest {
            method: request.method.clone(),
            path: path.clone(),
            query: request.url.query().map(str::to_owned),
            bearer: bearer.clone(),
            body: request.body.clone(),
        });

        if state.reject_all || bearer.as_deref() != Some(state.valid_token.as_str()) {
            return Ok(HttpResponse::new(
                StatusCode::UNAUTHORIZED,
                r#"{"error":"invalid token"}"#,
            ));
        }

        let (status, body) = state
            .routes
            .get(&(request.method.clone(), path.clone()))
            .cloned()
            .unwrap_or_else(|| (200, json!({ "path": path }).to_string()));
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Ok(HttpResponse::new(status, body))
    }
}

/// Memory store that counts how often it was cleared.
#[derive(Default)]
pub struct CountingStore {
    inner: MemorySessionStore,
    clears: AtomicUsize,
}

impl CountingStore {
    pub fn with_tokens(access: &str, refresh: Option<&str>) -> Arc<Self> {
        let session = Session::new(access, refresh, Some("admin-1")).expect("session");
        Arc::new(Self {
            inner: MemorySessionStore::with_session(session),
            clears: AtomicUsize::new(0),
        })
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::Acquire)
    }
}

impl SessionStorage for CountingStore {
    fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        self.inner.load()
    }

    fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        self.inner.save(session)
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        self.clears.fetch_add(1, Ordering::AcqRel);
        self.inner.clear()
    }

    fn set_access_token(&self, token: &str) -> Result<(), SessionStoreError> {
        self.inner.set_access_token(token)
    }
}

#[derive(Default)]
pub struct RecordingExpiry {
    calls: Mutex<Vec<(String, SessionExpiredReason)>>,
}

impl RecordingExpiry {
    pub fn calls(&self) -> Vec<(String, SessionExpiredReason)> {
        lock_unpoisoned(&self.calls).clone()
    }
}

impl SessionExpiryHandler for RecordingExpiry {
    fn session_expired(&self, login_path: &str, reason: &SessionExpiredReason) {
        lock_unpoisoned(&self.calls).push((login_path.to_owned(), reason.clone()));
    }
}

pub struct Harness {
    pub client: Arc<AdminApiClient>,
    pub backend: Arc<FakeBackend>,
    pub store: Arc<CountingStore>,
    pub expiry: Arc<RecordingExpiry>,
}

pub fn harness(backend: Arc<FakeBackend>, store: Arc<CountingStore>) -> Harness {
    let expiry = Arc::new(RecordingExpiry::default());
    let client = AdminApiClient::with_transport(
        AdminApiConfig::new(BASE_URL),
        store.clone(),
        backend.clone(),
    )
    .with_expiry_handler(expiry.clone());

    Harness {
        client: Arc::new(client),
        backend,
        store,
        expiry,
    }
}

pub fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
