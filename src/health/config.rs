//! Responder configuration.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use http::StatusCode;
use serde_json::{Map, Value};

use crate::config::{DEFAULT_HEALTH_PATH, DEFAULT_HEALTH_STATUS};
use crate::error::DiagnosticError;

/// Key/value pairs merged into the top level of a health payload.
pub type InfoMap = Map<String, Value>;

type Producer = dyn Fn() -> BoxFuture<'static, Result<InfoMap, DiagnosticError>> + Send + Sync;

/// Custom diagnostic data, either fixed at setup or produced per request.
#[derive(Clone)]
pub enum Info {
    Static(InfoMap),
    /// Invoked once per matched request and awaited without a timeout.
    Dynamic(Arc<Producer>),
}

impl Info {
    /// Wraps an async closure as a per-request producer.
    ///
    /// ```
    /// use heartbeat::health::Info;
    /// use serde_json::json;
    ///
    /// let info = Info::dynamic(|| async {
    ///     let mut map = serde_json::Map::new();
    ///     map.insert("dbOk".to_string(), json!(true));
    ///     Ok(map)
    /// });
    /// # let _ = info;
    /// ```
    pub fn dynamic<F, Fut>(producer: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<InfoMap, DiagnosticError>> + Send + 'static,
    {
        Info::Dynamic(Arc::new(move || producer().boxed()))
    }

    /// Resolve to a map, suspending only for dynamic producers.
    pub async fn resolve(&self) -> Result<InfoMap, DiagnosticError> {
        match self {
            Info::Static(map) => Ok(map.clone()),
            Info::Dynamic(producer) => producer().await,
        }
    }
}

impl Default for Info {
    fn default() -> Self {
        Info::Static(InfoMap::new())
    }
}

impl From<InfoMap> for Info {
    fn from(map: InfoMap) -> Self {
        Info::Static(map)
    }
}

impl fmt::Debug for Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Info::Static(map) => f.debug_tuple("Static").field(map).finish(),
            Info::Dynamic(_) => f.write_str("Dynamic(<producer>)"),
        }
    }
}

/// Settings for a [`HealthResponder`](super::HealthResponder).
///
/// Read-only once handed to the responder. Every field has a default;
/// override them with the `with_*` setters or struct update syntax:
///
/// ```
/// use heartbeat::health::HealthConfig;
///
/// let config = HealthConfig::default()
///     .with_path("/healthz")
///     .with_env_keys(["REGION"]);
/// assert!(config.include_env);
/// ```
#[derive(Debug, Clone)]
pub struct HealthConfig {
    /// Exact request path to answer on; no prefix or trailing-slash matching
    pub path: String,
    pub info: Info,
    /// Status label for successful probes, overridable by `info`
    pub status: String,
    /// HTTP status for successful probes; failures always use 500
    pub status_code: StatusCode,
    pub include_env: bool,
    /// Environment variables to report when `include_env` is set
    pub env_keys: Vec<String>,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_HEALTH_PATH.to_string(),
            info: Info::default(),
            status: DEFAULT_HEALTH_STATUS.to_string(),
            status_code: StatusCode::OK,
            include_env: false,
            env_keys: Vec::new(),
        }
    }
}

impl HealthConfig {
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_info(mut self, info: impl Into<Info>) -> Self {
        self.info = info.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_status_code(mut self, status_code: StatusCode) -> Self {
        self.status_code = status_code;
        self
    }

    pub fn with_include_env(mut self, include_env: bool) -> Self {
        self.include_env = include_env;
        self
    }

    /// Sets the reported variables and turns `include_env` on.
    pub fn with_env_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.env_keys = keys.into_iter().map(Into::into).collect();
        self.include_env = true;
        self
    }
}
