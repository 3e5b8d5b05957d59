//! HTTP server module.
//!
//! Binds the listener, serves the router and drains connections on
//! SIGTERM/SIGINT.

mod serve;
mod shutdown;

pub use serve::{start_server, ServerError};
pub use shutdown::shutdown_signal;
