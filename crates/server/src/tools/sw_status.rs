//! sw_status tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use swcache_core::Registration;

use super::json_result;

/// Report the active and waiting versions.
pub async fn status_impl(registration: &Registration) -> Result<CallToolResult, McpError> {
    json_result(&registration.status().await)
}
