//! Shared utilities for integration testing.

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, header::LOCATION, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use webhook_relay::{HttpServer, RelayConfig, Shutdown};

/// One request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct Received {
    pub method: Method,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// How the mock backend answers.
#[derive(Clone)]
struct Script {
    status: StatusCode,
    body: &'static str,
    delay: Duration,
    location: Option<&'static str>,
    log: Arc<Mutex<Vec<Received>>>,
}

/// A running mock backend.
pub struct MockBackend {
    pub addr: SocketAddr,
    log: Arc<Mutex<Vec<Received>>>,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn received(&self) -> Vec<Received> {
        self.log.lock().unwrap().clone()
    }
}

async fn record(
    State(script): State<Script>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    script.log.lock().unwrap().push(Received {
        method,
        path: uri.path().to_string(),
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    if !script.delay.is_zero() {
        tokio::time::sleep(script.delay).await;
    }
    match script.location {
        Some(location) => (script.status, [(LOCATION, location)], script.body).into_response(),
        None => (script.status, script.body).into_response(),
    }
}

/// Start a backend that records every request and answers with `status`
/// and `body` after `delay`.
pub async fn start_backend(status: u16, body: &'static str, delay: Duration) -> MockBackend {
    spawn_backend(status, body, delay, None).await
}

/// Start a backend that answers every request with `status` and a
/// `Location: <location>` header.
#[allow(dead_code)]
pub async fn start_redirecting_backend(status: u16, location: &'static str) -> MockBackend {
    spawn_backend(status, "moved", Duration::ZERO, Some(location)).await
}

async fn spawn_backend(
    status: u16,
    body: &'static str,
    delay: Duration,
    location: Option<&'static str>,
) -> MockBackend {
    let log = Arc::new(Mutex::new(Vec::new()));
    let script = Script {
        status: StatusCode::from_u16(status).unwrap(),
        body,
        delay,
        location,
        log: log.clone(),
    };

    let app = Router::new()
        .route("/", any(record))
        .route("/{*path}", any(record))
        .layer(axum::extract::DefaultBodyLimit::disable())
        .with_state(script);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockBackend { addr, log }
}

/// Start a raw backend that sends a response head announcing
/// `Content-Length: 100`, writes only `partial`, then stalls for `stall`.
#[allow(dead_code)]
pub async fn start_stalling_backend(
    status_line: &'static str,
    partial: &'static str,
    stall: Duration,
) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        let head = format!(
                            "HTTP/1.1 {}\r\nContent-Length: 100\r\n\r\n{}",
                            status_line, partial
                        );
                        let _ = socket.write_all(head.as_bytes()).await;
                        let _ = socket.flush().await;
                        tokio::time::sleep(stall).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// A local address nothing is listening on.
#[allow(dead_code)]
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/webhook.php", addr)
}

/// Start the relay pointed at `backend_url`; returns its address and the
/// shutdown handle that stops it.
pub async fn start_relay(backend_url: &str, timeout_secs: u64) -> (SocketAddr, Shutdown) {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.backend.url = backend_url.to_string();
    config.backend.timeout_secs = timeout_secs;

    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
