//! Observability subsystem.
//!
//! Relay events are emitted with `tracing` inside a per-request span that
//! carries the request id and method; `logging.rs` installs the subscriber.

pub mod logging;

pub use logging::init_logging;
