//! cache_delete tool implementation.
//!
//! Removes one stored entry, or a whole store when no URL is given.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_core::{CacheDb, Request, RequestMode};

use crate::tools::json_result;

/// Parameters for the cache_delete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheDeleteParams {
    /// Name of the store.
    pub cache_name: String,

    /// Absolute URL of the stored GET request. Omit to delete the whole store.
    #[serde(default)]
    pub url: Option<String>,
}

/// Output from the cache_delete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheDeleteOutput {
    /// Whether anything was removed.
    pub deleted: bool,
}

/// Implementation of the cache_delete tool.
pub async fn delete_impl(db: &CacheDb, params: CacheDeleteParams) -> Result<CallToolResult, McpError> {
    let deleted = match params.url {
        Some(url) => {
            let request = Request::parse("GET", &url, RequestMode::NoCors)?;
            db.cache(&params.cache_name).delete(&request).await?
        }
        None => db.delete_cache(&params.cache_name).await?,
    };

    tracing::debug!(cache = %params.cache_name, deleted, "cache_delete");
    json_result(&CacheDeleteOutput { deleted })
}
