//! Heartbeat - a configurable health-check responder for axum services.
//!
//! Build a [`health::HealthResponder`] from a [`health::HealthConfig`] and
//! install it with `axum::middleware::from_fn_with_state(responder,
//! health::health_layer)`. It answers `GET` on the configured path with a
//! JSON health report and passes every other request through.
//!
//! Process statistics and environment lookups go through the
//! [`runtime::RuntimeInfoProvider`] and [`env::EnvironmentReader`] traits so
//! they can be replaced in tests.

pub mod config;
pub mod env;
pub mod error;
pub mod health;
pub mod middleware;
pub mod routes;
pub mod runtime;
pub mod server;

pub use error::DiagnosticError;
pub use health::{health_layer, HealthConfig, HealthResponder, Info};
