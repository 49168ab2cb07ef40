//! The forwarder: one inbound POST in, one outbound POST out.
//!
//! # Flow
//! ```text
//! InboundRequest
//!     → method != POST  → Reply::Status (no outbound call)
//!     → method == POST  → log preview
//!                       → POST body verbatim to backend (bounded by timeout)
//!                       → BackendResponse (status, body | RelayFailure)
//! ```

use axum::body::Bytes;
use axum::http::{header::CONTENT_TYPE, Method, StatusCode};
use std::borrow::Cow;
use std::time::{Duration, Instant};
use url::Url;

use crate::config::{BackendConfig, RelayConfig};
use crate::relay::failure::{RelayError, RelayFailure};

/// Body returned to callers that do not POST.
pub const STATUS_PAYLOAD: &str = r#"{"status": "Proxy Active"}"#;

/// The parts of an inbound request the relay cares about.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub body: Bytes,
}

impl InboundRequest {
    pub fn new(method: Method, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            body: body.into(),
        }
    }
}

/// Result of a single relay attempt.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    /// Status reported by the backend, if one was received.
    pub status: Option<StatusCode>,
    /// Backend body; empty when the attempt failed.
    pub body: Bytes,
    pub error: Option<RelayFailure>,
}

impl BackendResponse {
    pub fn delivered(status: StatusCode, body: Bytes) -> Self {
        Self {
            status: Some(status),
            body,
            error: None,
        }
    }

    pub fn failed(failure: RelayFailure) -> Self {
        Self {
            status: failure.status(),
            body: Bytes::new(),
            error: Some(failure),
        }
    }

    pub fn is_delivered(&self) -> bool {
        self.error.is_none()
    }

    /// Status to hand back to the caller. Falls back to 200 whenever the
    /// backend status is unknown, including after a failure.
    pub fn caller_status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// Body to hand back to the caller.
    pub fn caller_body(&self) -> Bytes {
        match &self.error {
            Some(failure) => Bytes::from(format!("Error: {}", failure)),
            None => self.body.clone(),
        }
    }
}

/// What the forwarder decided to answer.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Fixed liveness payload for non-POST requests.
    Status,
    /// Outcome of relaying a POST.
    Relayed(BackendResponse),
}

/// Relays inbound bodies to a single backend.
///
/// Cheap to clone; the underlying client handle is shared.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    backend: Url,
    timeout: Duration,
    preview_bytes: usize,
}

impl Forwarder {
    /// Create a forwarder for the given backend.
    pub fn new(backend: &BackendConfig, preview_bytes: usize) -> Result<Self, RelayError> {
        let url = Url::parse(&backend.url).map_err(|source| RelayError::InvalidUrl {
            url: backend.url.clone(),
            source,
        })?;
        if backend.timeout_secs == 0 {
            return Err(RelayError::ZeroTimeout);
        }
        let timeout = Duration::from_secs(backend.timeout_secs);

        // Redirects are relayed to the caller, never followed.
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .build()?;

        tracing::debug!(
            backend = %url,
            timeout_secs = backend.timeout_secs,
            "Forwarder ready"
        );

        Ok(Self {
            client,
            backend: url,
            timeout,
            preview_bytes,
        })
    }

    pub fn from_config(config: &RelayConfig) -> Result<Self, RelayError> {
        Self::new(&config.backend, config.observability.preview_bytes)
    }

    pub fn backend_url(&self) -> &Url {
        &self.backend
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Handle one inbound request.
    pub async fn handle(&self, request: InboundRequest) -> Reply {
        if request.method != Method::POST {
            tracing::info!(method = %request.method, "Status probe");
            return Reply::Status;
        }

        tracing::info!(
            bytes = request.body.len(),
            preview = %preview(&request.body, self.preview_bytes),
            "Webhook received"
        );

        Reply::Relayed(self.relay(request.body).await)
    }

    /// POST `body` to the backend exactly once.
    pub async fn relay(&self, body: Bytes) -> BackendResponse {
        let started = Instant::now();

        let sent = self
            .client
            .post(self.backend.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(e) => return self.fail(None, &e, started),
        };

        let status = response.status();
        match response.bytes().await {
            Ok(body) => {
                tracing::info!(
                    status = status.as_u16(),
                    bytes = body.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Backend OK"
                );
                BackendResponse::delivered(status, body)
            }
            Err(e) => self.fail(Some(status), &e, started),
        }
    }

    fn fail(
        &self,
        status: Option<StatusCode>,
        err: &reqwest::Error,
        started: Instant,
    ) -> BackendResponse {
        let failure = RelayFailure::from_reqwest(status, err);
        tracing::error!(
            backend = %self.backend,
            status = failure.status().map(|s| s.as_u16()),
            timeout = failure.is_timeout(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            error = %failure,
            "Backend call failed"
        );
        BackendResponse::failed(failure)
    }
}

/// The first `limit` bytes of `body`, decoded lossily for logging.
///
/// A multi-byte character cut at the boundary shows up as U+FFFD.
pub fn preview(body: &[u8], limit: usize) -> Cow<'_, str> {
    let end = body.len().min(limit);
    String::from_utf8_lossy(&body[..end])
}
