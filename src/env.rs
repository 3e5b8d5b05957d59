//! Environment lookup used by the health responder.
//!
//! The responder never touches `std::env` directly: it reads through an
//! [`EnvironmentReader`] so probes can be tested against a fixed map.

use std::collections::HashMap;

use crate::config::{PRODUCTION_ENV_VALUE, PRODUCTION_ENV_VAR};

/// String-keyed lookup of environment values.
pub trait EnvironmentReader: Send + Sync {
    /// Returns the value for `key`, or `None` if it is not set.
    fn get(&self, key: &str) -> Option<String>;

    /// Whether the deployment is flagged as production.
    ///
    /// Production mode hides error detail from health responses.
    fn is_production(&self) -> bool {
        self.get(PRODUCTION_ENV_VAR)
            .map(|value| value.trim().eq_ignore_ascii_case(PRODUCTION_ENV_VALUE))
            .unwrap_or(false)
    }
}

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl EnvironmentReader for ProcessEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        // Non-UTF-8 values count as absent
        std::env::var(key).ok()
    }
}

impl EnvironmentReader for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_map_lookup() {
        let env = env(&[("A", "1")]);
        assert_eq!(EnvironmentReader::get(&env, "A"), Some("1".to_string()));
        assert_eq!(EnvironmentReader::get(&env, "B"), None);
    }

    #[test]
    fn test_production_flag() {
        assert!(env(&[("APP_ENV", "production")]).is_production());
        assert!(env(&[("APP_ENV", " Production ")]).is_production());
        assert!(!env(&[("APP_ENV", "staging")]).is_production());
        assert!(!env(&[]).is_production());
    }

    #[test]
    fn test_process_environment_reads_path() {
        // PATH is set in every test runner we support
        assert!(ProcessEnvironment.get("PATH").is_some());
        assert_eq!(
            ProcessEnvironment.get("HEARTBEAT_TEST_SURELY_UNSET_VARIABLE"),
            None
        );
    }
}
