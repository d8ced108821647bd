//! sw_message tool implementation.
//!
//! Delivers a page message to the registration, waiting version first.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_core::{Registration, RegistrationStatus};

use super::json_result;

/// Parameters for the sw_message tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwMessageParams {
    /// Message payload, e.g. `{"type": "SKIP_WAITING"}`.
    pub message: serde_json::Value,
}

/// Output from the sw_message tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwMessageOutput {
    /// Whether a controller recognised the message.
    pub handled: bool,
    /// Registration state after delivery.
    pub status: RegistrationStatus,
}

pub async fn message_impl(registration: &Registration, params: SwMessageParams) -> Result<CallToolResult, McpError> {
    let handled = registration.post_message(&params.message).await?;
    let status = registration.status().await;
    json_result(&SwMessageOutput { handled, status })
}
