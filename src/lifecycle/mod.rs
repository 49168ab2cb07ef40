//! Lifecycle management.
//!
//! ```text
//! Startup (main.rs):
//!     CLI → load config → validate → init logging → build forwarder → bind → serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → broadcast → stop accepting → drain in-flight relays → exit
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
