//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use std::collections::HashSet;

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `cache_name` or `manifest` is empty, and
    /// `ConfigError::Invalid` if:
    /// - `scope` is not an absolute http(s) URL
    /// - `manifest` lists the same path twice
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_name.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: "cache_name".into(),
                hint: "Set SWCACHE_CACHE_NAME to the release version tag".into(),
            });
        }

        match url::Url::parse(&self.scope) {
            Ok(scope) if matches!(scope.scheme(), "http" | "https") => {}
            Ok(scope) => {
                return Err(ConfigError::Invalid {
                    field: "scope".into(),
                    reason: format!("unsupported scheme: {}", scope.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::Invalid { field: "scope".into(), reason: e.to_string() });
            }
        }

        if self.manifest.is_empty() {
            return Err(ConfigError::Missing {
                field: "manifest".into(),
                hint: "List at least the page itself, e.g. [\"./\"]".into(),
            });
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.manifest.iter().find(|p| !seen.insert(p.as_str())) {
            return Err(ConfigError::Invalid { field: "manifest".into(), reason: format!("duplicate entry {dup}") });
        }

        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must not exceed 50MB".into() });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_cache_name() {
        let config = AppConfig { cache_name: "  ".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Missing { field, .. }) if field == "cache_name"));
    }

    #[test]
    fn test_validate_relative_scope() {
        let config = AppConfig { scope: "./clock/".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "scope"));
    }

    #[test]
    fn test_validate_file_scope() {
        let config = AppConfig { scope: "file:///srv/clock/".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "scope"));
    }

    #[test]
    fn test_validate_empty_manifest() {
        let config = AppConfig { manifest: Vec::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Missing { field, .. }) if field == "manifest"));
    }

    #[test]
    fn test_validate_duplicate_manifest() {
        let config = AppConfig { manifest: vec!["./".into(), "./main.js".into(), "./".into()], ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "manifest"));
    }

    #[test]
    fn test_validate_max_bytes_zero() {
        let config = AppConfig { max_bytes: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_bytes"));
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let low = AppConfig { timeout_ms: 50, ..Default::default() };
        assert!(matches!(low.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));

        let high = AppConfig { timeout_ms: 301_000, ..Default::default() };
        assert!(matches!(high.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));

        let edge = AppConfig { timeout_ms: 100, max_bytes: 1, ..Default::default() };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }
}
