//! MCP tool implementations.
//!
//! This module contains all tools exposed by the swcache server.

pub mod cache;
pub mod sw_fetch;
pub mod sw_message;
pub mod sw_register;
pub mod sw_status;

#[cfg(test)]
pub(crate) mod testing;

use std::collections::BTreeMap;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_core::{Error, Response};

/// A response as returned to the MCP client.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResponseOutput {
    pub status: u16,
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
    pub content_type: Option<String>,
    /// Final URL the response was served from, if known.
    pub url: Option<String>,
    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub body: String,
    pub body_len: usize,
}

impl From<&Response> for ResponseOutput {
    fn from(response: &Response) -> Self {
        Self {
            status: response.status,
            status_text: response.status_text.clone(),
            headers: response.headers.iter().cloned().collect(),
            content_type: response.content_type().map(str::to_string),
            url: response.url.as_ref().map(|u| u.to_string()),
            body: String::from_utf8_lossy(&response.body).into_owned(),
            body_len: response.body.len(),
        }
    }
}

/// Serialize a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
