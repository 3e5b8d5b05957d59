//! Response bodies for health probes.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::DiagnosticError;
use crate::runtime::{CpuUsage, MemoryUsage};

use super::config::InfoMap;

/// Seconds in an hour
const SECONDS_PER_HOUR: u64 = 3600;
/// Seconds in a minute
const SECONDS_PER_MINUTE: u64 = 60;

/// Message carried by every error payload
pub const HEALTH_CHECK_FAILED: &str = "Health check failed";

/// Formats an uptime as `"<h>h <m>m <s>s"`, flooring each component.
///
/// Hours are not wrapped into days. Negative or non-finite input reads as
/// zero.
pub fn format_uptime(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = total / SECONDS_PER_HOUR;
    let minutes = (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let secs = total % SECONDS_PER_MINUTE;
    format!("{}h {}m {}s", hours, minutes, secs)
}

/// Current time as an RFC 3339 UTC string with millisecond precision.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Fields every successful probe reports before custom info is merged in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltinFields {
    pub status: String,
    pub timestamp: String,
    pub uptime: String,
    pub pid: u32,
    pub memory_usage: MemoryUsage,
    pub cpu_usage: CpuUsage,
    pub version: String,
    pub platform: String,
    pub architecture: String,
}

/// Success body: built-in fields, merged custom info and optional `env`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HealthPayload(Map<String, Value>);

impl HealthPayload {
    /// Merge `custom` over `builtins`.
    ///
    /// The merge is shallow: a custom key replaces the built-in value of the
    /// same name wholesale, nested objects included.
    pub fn merge(builtins: BuiltinFields, custom: InfoMap) -> Result<Self, DiagnosticError> {
        let mut fields = match serde_json::to_value(builtins)? {
            Value::Object(map) => map,
            other => {
                return Err(DiagnosticError::new(format!(
                    "Built-in health fields serialized to {} instead of an object",
                    other
                )))
            }
        };
        fields.extend(custom);
        Ok(Self(fields))
    }

    /// Attach the `env` sub-map, replacing any `env` key from custom info.
    pub fn set_env(&mut self, env: Map<String, Value>) {
        self.0.insert("env".to_string(), Value::Object(env));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Failure body, returned with HTTP 500.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub status: &'static str,
    pub message: &'static str,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    pub timestamp: String,
}

impl ErrorPayload {
    /// Build from a diagnostic failure; `detailed` controls whether the
    /// source chain is exposed as `stack`.
    pub fn from_error(err: &DiagnosticError, detailed: bool) -> Self {
        Self {
            status: "error",
            message: HEALTH_CHECK_FAILED,
            error: err.message().to_string(),
            stack: detailed.then(|| err.detail()),
            timestamp: timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn builtins() -> BuiltinFields {
        BuiltinFields {
            status: "ok".to_string(),
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
            uptime: "0h 0m 5s".to_string(),
            pid: 42,
            memory_usage: MemoryUsage {
                rss: 1,
                heap_total: 2,
                heap_used: 3,
                external: 4,
            },
            cpu_usage: CpuUsage {
                percent: 0.0,
                cores: 2,
            },
            version: "1.0.0".to_string(),
            platform: "linux".to_string(),
            architecture: "x86_64".to_string(),
        }
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(3661.0), "1h 1m 1s");
        assert_eq!(format_uptime(59.0), "0h 0m 59s");
        assert_eq!(format_uptime(0.0), "0h 0m 0s");
    }

    #[test]
    fn test_format_uptime_floors_fractions() {
        assert_eq!(format_uptime(59.999), "0h 0m 59s");
        assert_eq!(format_uptime(3599.5), "0h 59m 59s");
    }

    #[test]
    fn test_format_uptime_does_not_wrap_days() {
        assert_eq!(format_uptime(90_000.0), "25h 0m 0s");
    }

    #[test]
    fn test_format_uptime_rejects_garbage() {
        assert_eq!(format_uptime(-5.0), "0h 0m 0s");
        assert_eq!(format_uptime(f64::NAN), "0h 0m 0s");
        assert_eq!(format_uptime(f64::INFINITY), "0h 0m 0s");
    }

    #[test]
    fn test_timestamp_is_rfc3339_utc() {
        let ts = timestamp();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_merge_overrides_builtins() {
        let mut custom = InfoMap::new();
        custom.insert("status".to_string(), json!("degraded"));
        custom.insert("region".to_string(), json!("us"));

        let payload = HealthPayload::merge(builtins(), custom).unwrap();
        assert_eq!(payload.get("status"), Some(&json!("degraded")));
        assert_eq!(payload.get("region"), Some(&json!("us")));
        assert_eq!(payload.get("pid"), Some(&json!(42)));
        assert_eq!(payload.get("memoryUsage").unwrap()["heapTotal"], 2);
    }

    #[test]
    fn test_merge_replaces_nested_objects_wholesale() {
        let mut custom = InfoMap::new();
        custom.insert("memoryUsage".to_string(), json!({"rss": 7}));

        let payload = HealthPayload::merge(builtins(), custom).unwrap();
        assert_eq!(payload.get("memoryUsage"), Some(&json!({"rss": 7})));
    }

    #[test]
    fn test_env_replaces_custom_env() {
        let mut custom = InfoMap::new();
        custom.insert("env".to_string(), json!("from-info"));

        let mut payload = HealthPayload::merge(builtins(), custom).unwrap();
        let mut env = Map::new();
        env.insert("A".to_string(), json!("1"));
        payload.set_env(env);

        assert_eq!(payload.get("env"), Some(&json!({"A": "1"})));
    }

    #[test]
    fn test_error_payload_hides_stack_when_not_detailed() {
        let err = DiagnosticError::new("db down");
        let value = serde_json::to_value(ErrorPayload::from_error(&err, false)).unwrap();

        assert_eq!(value["status"], "error");
        assert_eq!(value["message"], "Health check failed");
        assert_eq!(value["error"], "db down");
        assert!(value.get("stack").is_none());
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_error_payload_includes_stack_when_detailed() {
        let err = DiagnosticError::new("db down");
        let value = serde_json::to_value(ErrorPayload::from_error(&err, true)).unwrap();
        assert_eq!(value["stack"], "DiagnosticError: db down");
    }
}
