//! sw_register tool implementation.
//!
//! Installs a controller version and activates it when allowed.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_core::{AppConfig, Error, Registration, WorkerConfig};

use super::json_result;

/// Parameters for the sw_register tool. Missing fields fall back to the loaded configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SwRegisterParams {
    /// Store name for this version, e.g. "digital-clock-v4".
    #[serde(default)]
    pub cache_name: Option<String>,

    /// Asset paths to precache, relative to the scope.
    #[serde(default)]
    pub manifest: Option<Vec<String>>,
}

pub async fn register_impl(
    registration: &Registration, config: &AppConfig, params: SwRegisterParams,
) -> Result<CallToolResult, McpError> {
    let mut config = config.clone();
    if let Some(cache_name) = params.cache_name {
        config.cache_name = cache_name;
    }
    if let Some(manifest) = params.manifest {
        config.manifest = manifest;
    }
    config.validate().map_err(|e| Error::InvalidInput(e.to_string()))?;

    let worker = WorkerConfig::from_app_config(&config)?;
    let outcome = registration.register(worker).await?;
    json_result(&outcome)
}
