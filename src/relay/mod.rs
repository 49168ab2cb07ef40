//! Webhook relay subsystem.
//!
//! # Responsibilities
//! - Answer non-POST requests with a fixed status payload
//! - Forward POST bodies verbatim to the configured backend
//! - Bound every outbound call with the configured timeout
//! - Record the outcome (status + body, or a failure description)
//!
//! # Design Decisions
//! - Exactly one outbound attempt per inbound POST; no retries
//! - Backend URL is fixed at construction, never taken from the request
//! - Unknown backend status maps to 200, even on failure

pub mod failure;
pub mod forwarder;

pub use failure::{RelayError, RelayFailure};
pub use forwarder::{preview, BackendResponse, Forwarder, InboundRequest, Reply, STATUS_PAYLOAD};
