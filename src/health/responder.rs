//! The health responder and its axum middleware entry point.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};

use crate::config::CACHE_CONTROL_HEALTH;
use crate::env::{EnvironmentReader, ProcessEnvironment};
use crate::error::DiagnosticError;
use crate::runtime::{RuntimeInfoProvider, SystemRuntime};

use super::config::HealthConfig;
use super::payload::{format_uptime, timestamp, BuiltinFields, ErrorPayload, HealthPayload};

/// Answers `GET <path>` with a JSON health report.
///
/// Cloning is cheap; all clones share the same read-only configuration and
/// collaborators, so one responder serves any number of concurrent probes.
#[derive(Clone)]
pub struct HealthResponder {
    config: Arc<HealthConfig>,
    runtime: Arc<dyn RuntimeInfoProvider>,
    env: Arc<dyn EnvironmentReader>,
}

impl HealthResponder {
    /// Responder backed by the live process and its environment.
    pub fn new(config: HealthConfig) -> Self {
        Self::with_collaborators(
            config,
            Arc::new(SystemRuntime::new()),
            Arc::new(ProcessEnvironment),
        )
    }

    pub fn with_collaborators(
        config: HealthConfig,
        runtime: Arc<dyn RuntimeInfoProvider>,
        env: Arc<dyn EnvironmentReader>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            runtime,
            env,
        }
    }

    pub fn config(&self) -> &HealthConfig {
        &self.config
    }

    /// Whether this responder owns the request: GET on exactly the
    /// configured path. `/health/` and `/health/db` do not match `/health`.
    pub fn matches(&self, method: &Method, path: &str) -> bool {
        method == Method::GET && path == self.config.path
    }

    /// Collect the health payload for one probe.
    ///
    /// The only await point is a dynamic `info` producer, which is awaited
    /// without a timeout.
    pub async fn assemble(&self) -> Result<HealthPayload, DiagnosticError> {
        let uptime = self.runtime.uptime_secs();

        let custom = self.config.info.resolve().await?;

        let builtins = BuiltinFields {
            status: self.config.status.clone(),
            timestamp: timestamp(),
            uptime: format_uptime(uptime),
            pid: self.runtime.pid(),
            memory_usage: self.runtime.memory_usage()?,
            cpu_usage: self.runtime.cpu_usage()?,
            version: self.runtime.version(),
            platform: self.runtime.platform(),
            architecture: self.runtime.architecture(),
        };

        let mut payload = HealthPayload::merge(builtins, custom)?;

        if let Some(env) = self.collect_env() {
            payload.set_env(env);
        }

        Ok(payload)
    }

    /// Values of `env_keys` that are set, in configured order.
    ///
    /// `None` unless `include_env` is on and at least one key is configured.
    fn collect_env(&self) -> Option<Map<String, Value>> {
        if !self.config.include_env || self.config.env_keys.is_empty() {
            return None;
        }

        let env = self
            .config
            .env_keys
            .iter()
            .filter_map(|key| {
                self.env
                    .get(key)
                    .map(|value| (key.clone(), Value::String(value)))
            })
            .collect();
        Some(env)
    }

    /// Run the probe and turn the outcome into exactly one response.
    pub async fn respond(&self) -> Response {
        let outcome = match self.assemble().await {
            Ok(payload) => serde_json::to_vec(&payload).map_err(DiagnosticError::from),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(body) => {
                tracing::debug!(
                    path = %self.config.path,
                    status = self.config.status_code.as_u16(),
                    "Health probe served"
                );
                (
                    self.config.status_code,
                    [
                        (CONTENT_TYPE, HeaderValue::from_static("application/json")),
                        (CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_HEALTH)),
                    ],
                    body,
                )
                    .into_response()
            }
            Err(err) => self.error_response(&err),
        }
    }

    fn error_response(&self, err: &DiagnosticError) -> Response {
        let detailed = !self.env.is_production();
        tracing::error!(
            path = %self.config.path,
            error = %err,
            detail = %err.detail(),
            "Health diagnostics failed"
        );

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_HEALTH))],
            Json(ErrorPayload::from_error(err, detailed)),
        )
            .into_response()
    }
}

impl Default for HealthResponder {
    fn default() -> Self {
        Self::new(HealthConfig::default())
    }
}

/// Middleware that answers health probes and passes everything else on.
///
/// ```no_run
/// use axum::{middleware, Router};
/// use heartbeat::health::{health_layer, HealthResponder};
///
/// let app: Router = Router::new()
///     .layer(middleware::from_fn_with_state(HealthResponder::default(), health_layer));
/// # let _ = app;
/// ```
pub async fn health_layer(
    State(responder): State<HealthResponder>,
    request: Request,
    next: Next,
) -> Response {
    if !responder.matches(request.method(), request.uri().path()) {
        return next.run(request).await;
    }

    responder.respond().await
}
