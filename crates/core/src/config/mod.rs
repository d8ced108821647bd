//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SWCACHE_*)
//! 2. TOML config file (if SWCACHE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Assets the clock page needs for full offline operation.
pub const DEFAULT_MANIFEST: &[&str] = &[
    "./",
    "./index.html",
    "./index.css",
    "./main.js",
    "./manifest.json",
    "./public/android-chrome-192x192.png",
    "./public/android-chrome-512x512.png",
    "./public/apple-touch-icon.png",
    "./public/favicon-16x16.png",
    "./public/favicon-32x32.png",
    "./public/favicon.ico",
    "./public/ss1.png",
];

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SWCACHE_*)
/// 2. TOML config file (if SWCACHE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version tag naming the current durable store.
    ///
    /// Bump on every asset-affecting release. Set via SWCACHE_CACHE_NAME.
    #[serde(default = "default_cache_name")]
    pub cache_name: String,

    /// Absolute URL the manifest paths resolve against; its origin decides
    /// what counts as same-origin.
    ///
    /// Set via SWCACHE_SCOPE.
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Relative asset paths precached at setup.
    ///
    /// Set via SWCACHE_MANIFEST (e.g. `["./", "./index.html"]`).
    #[serde(default = "default_manifest")]
    pub manifest: Vec<String>,

    /// Path to SQLite database holding every named store.
    ///
    /// Set via SWCACHE_DB_PATH.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for network requests.
    ///
    /// Set via SWCACHE_USER_AGENT.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes accepted per response.
    ///
    /// Set via SWCACHE_MAX_BYTES.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Network request timeout in milliseconds.
    ///
    /// Set via SWCACHE_TIMEOUT_MS.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_cache_name() -> String {
    "digital-clock-v3".into()
}

fn default_scope() -> String {
    "http://localhost:8080/".into()
}

fn default_manifest() -> Vec<String> {
    DEFAULT_MANIFEST.iter().map(|p| p.to_string()).collect()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./swcache.sqlite")
}

fn default_user_agent() -> String {
    "swcache/0.1".into()
}

fn default_max_bytes() -> usize {
    10_485_760 // 10MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_name: default_cache_name(),
            scope: default_scope(),
            manifest: default_manifest(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or environment cannot be parsed, or
    /// validation fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SWCACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SWCACHE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.cache_name, "digital-clock-v3");
        assert_eq!(config.scope, "http://localhost:8080/");
        assert_eq!(config.manifest.len(), DEFAULT_MANIFEST.len());
        assert_eq!(config.manifest[0], "./");
        assert_eq!(config.db_path, PathBuf::from("./swcache.sqlite"));
        assert_eq!(config.user_agent, "swcache/0.1");
        assert_eq!(config.timeout_ms, 20_000);
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
    }

    #[test]
    fn test_load_from_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SWCACHE_CACHE_NAME", "digital-clock-v4");
            jail.set_env("SWCACHE_MANIFEST", r#"["./", "./index.html"]"#);

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.cache_name, "digital-clock-v4");
            assert_eq!(config.manifest, vec!["./", "./index.html"]);
            Ok(())
        });
    }

    #[test]
    fn test_load_from_file_env_wins() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "swcache.toml",
                r#"
                cache_name = "from-file"
                scope = "https://clock.example.org/app/"
                "#,
            )?;
            jail.set_env("SWCACHE_CONFIG_FILE", "swcache.toml");
            jail.set_env("SWCACHE_CACHE_NAME", "from-env");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.cache_name, "from-env");
            assert_eq!(config.scope, "https://clock.example.org/app/");
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SWCACHE_TIMEOUT_MS", "5");
            assert!(matches!(AppConfig::load(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
            Ok(())
        });
    }
}
