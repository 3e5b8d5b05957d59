//! Health check endpoint for monitoring agents and orchestration probes.
//!
//! A [`HealthResponder`] is built once from a [`HealthConfig`] and installed
//! as axum middleware with [`health_layer`]. It answers `GET` on exactly the
//! configured path with a JSON report of process status and diagnostics,
//! and hands every other request to the inner router untouched.
//!
//! A successful probe returns the configured status code with:
//! - `status`, `timestamp`, `uptime` (`"<h>h <m>m <s>s"`) and `pid`
//! - `memoryUsage`, `cpuUsage`, `version`, `platform`, `architecture`
//! - every key of the resolved [`Info`], overriding built-ins of the same name
//! - `env`, when enabled, with the configured variables that are set
//!
//! If custom info or any process statistic fails, the probe returns 500 with
//! `status: "error"` instead. The failure never reaches the hosting router.

mod config;
mod payload;
mod responder;

pub use config::{HealthConfig, Info, InfoMap};
pub use payload::{format_uptime, ErrorPayload, HealthPayload, HEALTH_CHECK_FAILED};
pub use responder::{health_layer, HealthResponder};
