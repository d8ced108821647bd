//! cache_get tool implementation.
//!
//! Retrieves a stored response by request URL.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_core::{CacheDb, Error, Request, RequestMode};

use crate::tools::{ResponseOutput, json_result};

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// Name of the store to look in.
    pub cache_name: String,

    /// Absolute URL of the stored GET request.
    pub url: String,
}

/// Implementation of the cache_get tool.
pub async fn get_impl(db: &CacheDb, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    let request = Request::parse("GET", &params.url, RequestMode::NoCors)?;
    let response = db
        .cache(&params.cache_name)
        .match_request(&request)
        .await?
        .ok_or_else(|| Error::CacheMiss(format!("{} in {}", request.url, params.cache_name)))?;

    json_result(&ResponseOutput::from(&response))
}
