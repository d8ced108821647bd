//! cache_list tool implementation.
//!
//! Lists store names, or the entries of one store.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_core::{CacheDb, CachedEntry, Error};

use crate::tools::json_result;

/// Parameters for the cache_list tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CacheListParams {
    /// List the entries of this store instead of the store names.
    #[serde(default)]
    pub cache_name: Option<String>,
}

/// Output from the cache_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CacheListOutput {
    Caches { caches: Vec<String> },
    Entries { cache_name: String, entries: Vec<CachedEntry> },
}

/// Implementation of the cache_list tool.
pub async fn list_impl(db: &CacheDb, params: CacheListParams) -> Result<CallToolResult, McpError> {
    let output = match params.cache_name {
        None => CacheListOutput::Caches { caches: db.cache_names().await? },
        Some(name) => {
            if !db.has_cache(&name).await? {
                return Err(Error::CacheMiss(format!("no store named {name}")).into());
            }
            let entries = db.cache(&name).keys().await?;
            CacheListOutput::Entries { cache_name: name, entries }
        }
    };

    json_result(&output)
}
