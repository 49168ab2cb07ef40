//! Relay error types.
//!
//! [`RelayError`] covers everything that can go wrong while *building* a
//! forwarder. [`RelayFailure`] is the one runtime failure: the outbound
//! call did not produce a complete backend response.

use axum::http::StatusCode;
use std::error::Error as StdError;
use thiserror::Error;

/// Errors raised while constructing a [`Forwarder`](super::Forwarder).
#[derive(Debug, Error)]
pub enum RelayError {
    /// The configured backend URL could not be parsed.
    #[error("invalid backend url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A zero timeout would fail every outbound call immediately.
    #[error("backend timeout must be greater than zero")]
    ZeroTimeout,

    /// The outbound HTTP client could not be created.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// A failed outbound call.
///
/// Carries the status the backend reported before the failure, if it got
/// that far, and a human readable description that is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{description}")]
pub struct RelayFailure {
    status: Option<StatusCode>,
    description: String,
    timed_out: bool,
}

impl RelayFailure {
    pub fn new(status: Option<StatusCode>, description: impl Into<String>) -> Self {
        let description = description.into();
        let description = if description.trim().is_empty() {
            "request to backend failed".to_string()
        } else {
            description
        };
        Self {
            status,
            description,
            timed_out: false,
        }
    }

    /// Build a failure from a client error, recording `status` if the
    /// response head had already arrived.
    pub fn from_reqwest(status: Option<StatusCode>, err: &reqwest::Error) -> Self {
        Self {
            timed_out: err.is_timeout(),
            ..Self::new(status.or_else(|| err.status()), describe(err))
        }
    }

    /// Status recorded before the failure, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_timeout(&self) -> bool {
        self.timed_out
    }
}

/// Flatten an error and its sources into one line.
///
/// Client errors wrap the interesting part (connection refused, timed out)
/// several layers deep, so the whole chain is reported.
pub fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !parts.iter().any(|p| p.contains(&text)) {
            parts.push(text);
        }
        source = cause.source();
    }
    parts.retain(|p| !p.is_empty());
    parts.join(": ")
}
