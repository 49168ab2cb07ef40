//! Webhook relay library.
//!
//! Receives webhook POSTs, forwards the raw body to one configured backend
//! and answers the caller with the backend's status and body.
//!
//! ```text
//!   caller ──POST──▶ http::server ──▶ relay::Forwarder ──POST──▶ backend
//!   caller ◀─────── http::response ◀── BackendResponse ◀──────── backend
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::Forwarder;
