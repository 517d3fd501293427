use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use admin_api::{
    AdminApiClient, AdminApiConfig, AdminApiError, RequestOptions, SessionExpiredReason,
    StatusCode,
};
use serde_json::{json, Value};
use session_store::{MemorySessionStore, Session, SessionStorage};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

fn allow_local_integration() -> bool {
    std::env::var("ADMIN_API_ALLOW_LOCAL_INTEGRATION")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false)
}

#[derive(Clone)]
enum ScriptedResponse {
    Respond {
        status: u16,
        body: String,
        delay_ms: u64,
    },
    Reset,
}

struct ScriptedServer {
    base_url: String,
    request_count: Arc<AtomicUsize>,
    received: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl ScriptedServer {
    async fn new(scripts: Vec<ScriptedResponse>) -> Self {
        let scripts = Arc::new(scripts);
        let request_count = Arc::new(AtomicUsize::new(0));
        let received = Arc::new(Mutex::new(Vec::new()));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("local TCP listener should bind");
        let addr = listener
            .local_addr()
            .expect("resolved local listener address");
        let base_url = format!("http://{addr}/api");

        let handle = tokio::spawn({
            let scripts = Arc::clone(&scripts);
            let request_count = Arc::clone(&request_count);
            let received = Arc::clone(&received);

            async move {
                loop {
                    let (socket, _) = match listener.accept().await {
                        Ok(pair) => pair,
                        Err(_) => break,
                    };
                    let scripts = Arc::clone(&scripts);
                    let request_count = Arc::clone(&request_count);
                    let received = Arc::clone(&received);
                    tokio::spawn(async move {
                        serve_one(socket, scripts, request_count, received).await;
                    });
                }
            }
        });

        Self {
            base_url,
            request_count,
            received,
            handle,
        }
    }

    fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Acquire)
    }

    fn received(&self) -> Vec<String> {
        self.received
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn shutdown(&self) {
        self.handle.abort();
    }
}

fn response_json(status: u16, body: &str) -> ScriptedResponse {
    ScriptedResponse::Respond {
        status,
        body: body.to_string(),
        delay_ms: 0,
    }
}

fn client_for(server: &ScriptedServer, session: Session) -> (AdminApiClient, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::with_session(session));
    let config = AdminApiConfig::new(&server.base_url).with_timeout(Duration::from_secs(5));
    let client = AdminApiClient::new(config, store.clone()).expect("client");
    (client, store)
}

fn session(access: &str, refresh: Option<&str>) -> Session {
    Session::new(access, refresh, None::<String>).expect("session")
}

#[tokio::test]
async fn refresh_and_replay_over_http() {
    if !allow_local_integration() {
        return;
    }

    let server = ScriptedServer::new(vec![
        response_json(401, r#"{"error":"invalid token"}"#),
        response_json(200, r#"{"access_token":"fresh"}"#),
        response_json(200, r#"{"data":[{"id":1}]}"#),
    ])
    .await;
    let (client, store) = client_for(&server, session("old", Some("r1")));

    let response = client
        .get::<Value>("notifications", &[])
        .await
        .expect("replay should succeed");

    assert_eq!(response.data, json!({ "data": [{ "id": 1 }] }));
    assert_eq!(store.access_token().expect("load").as_deref(), Some("fresh"));

    let received = server.received();
    assert_eq!(received.len(), 3);
    assert!(received[0].starts_with("GET /api/notifications "));
    assert!(received[0].contains("authorization: Bearer old"));
    assert!(received[1].starts_with("POST /api/admin-refresh-token "));
    assert!(!received[1].contains("authorization:"));
    assert!(received[1].contains(r#""refresh_token":"r1""#));
    assert!(received[2].contains("authorization: Bearer fresh"));

    server.shutdown();
}

#[tokio::test]
async fn rejected_refresh_clears_session_over_http() {
    if !allow_local_integration() {
        return;
    }

    let server = ScriptedServer::new(vec![
        response_json(401, r#"{"error":"invalid token"}"#),
        response_json(403, r#"{"error":"refresh token revoked"}"#),
    ])
    .await;
    let (client, store) = client_for(&server, session("old", Some("r1")));

    let err = client
        .get::<Value>("orders", &[])
        .await
        .expect_err("refresh rejected");

    assert!(matches!(
        err,
        AdminApiError::SessionExpired(SessionExpiredReason::RefreshRejected(_))
    ));
    assert_eq!(store.load().expect("load"), None);
    assert_eq!(server.request_count(), 2);

    server.shutdown();
}

#[tokio::test]
async fn error_message_is_extracted_from_body() {
    if !allow_local_integration() {
        return;
    }

    let server =
        ScriptedServer::new(vec![response_json(422, r#"{"message":"name is required"}"#)]).await;
    let (client, _store) = client_for(&server, session("good", Some("r1")));

    let err = client
        .post::<Value>("categories", Some(json!({})), RequestOptions::default())
        .await
        .expect_err("validation error");

    match err {
        AdminApiError::Http { status, message, .. } => {
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(message, "name is required");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(server.received()[0].contains("content-type: application/json"));

    server.shutdown();
}

#[tokio::test]
async fn connection_reset_surfaces_as_network_error() {
    if !allow_local_integration() {
        return;
    }

    let server = ScriptedServer::new(vec![ScriptedResponse::Reset]).await;
    let (client, store) = client_for(&server, session("good", Some("r1")));

    let err = client
        .get::<Value>("products", &[])
        .await
        .expect_err("reset");

    assert!(matches!(err, AdminApiError::Network { .. }));
    assert!(store.load().expect("load").is_some());

    server.shutdown();
}

#[tokio::test]
async fn per_request_timeout_is_a_network_error() {
    if !allow_local_integration() {
        return;
    }

    let server = ScriptedServer::new(vec![ScriptedResponse::Respond {
        status: 200,
        body: "{}".to_string(),
        delay_ms: 2_000,
    }])
    .await;
    let (client, _store) = client_for(&server, session("good", Some("r1")));

    let err = client
        .get_one::<Value>(
            "services",
            5,
            RequestOptions::default().with_timeout(Duration::from_millis(200)),
        )
        .await
        .expect_err("timed out");

    assert!(matches!(err, AdminApiError::Network { .. }));

    server.shutdown();
}

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        403 => "Forbidden",
        422 => "Unprocessable Entity",
        _ => "Error",
    }
}

async fn serve_one(
    mut socket: TcpStream,
    scripts: Arc<Vec<ScriptedResponse>>,
    request_count: Arc<AtomicUsize>,
    received: Arc<Mutex<Vec<String>>>,
) {
    let Ok(request) = read_request(&mut socket).await else {
        return;
    };
    if let Ok(mut log) = received.lock() {
        log.push(request);
    }

    let index = request_count.fetch_add(1, Ordering::AcqRel);
    let response = scripts
        .get(index)
        .cloned()
        .unwrap_or_else(|| response_json(500, r#"{"error":"unexpected request"}"#));

    match response {
        ScriptedResponse::Reset => {}
        ScriptedResponse::Respond {
            status,
            body,
            delay_ms,
        } => {
            if delay_ms > 0 {
                sleep(Duration::from_millis(delay_ms)).await;
            }
            let head = format!(
                "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status_reason(status),
                body.len(),
            );

            if socket.write_all(head.as_bytes()).await.is_err() {
                return;
            }
            let _ = socket.write_all(body.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    }
}

/// Read the request head plus a `Content-Length` body, lowercasing header names.
async fn read_request(socket: &mut TcpStream) -> std::io::Result<String> {
    let mut request = Vec::new();
    let mut buffer = [0_u8; 2048];

    let head_end = loop {
        let n = socket.read(&mut buffer).await?;
        if n == 0 {
            break request.len();
        }
        request.extend_from_slice(&buffer[..n]);
        if let Some(position) = request.windows(4).position(|window| window == b"\r\n\r\n") {
            break position + 4;
        }
    };

    let head = String::from_utf8_lossy(&request[..head_end]).to_string();
    let mut lines = head.lines();
    let mut normalized = lines.next().unwrap_or_default().to_string();
    let mut content_length = 0_usize;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            if name == "content-length" {
                content_length = value.parse().unwrap_or(0);
            }
            normalized.push_str(&format!("\n{name}: {value}"));
        }
    }

    while request.len() < head_end + content_length {
        let n = socket.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buffer[..n]);
    }

    let body_end = request.len().min(head_end + content_length);
    normalized.push_str("\n\n");
    normalized.push_str(&String::from_utf8_lossy(&request[head_end..body_end]));
    Ok(normalized)
}
