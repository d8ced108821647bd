//! MCP server handler implementation.
//!
//! This module defines the host environment handler that routes tool calls
//! to the registration and the durable store.
use std::sync::Arc;

use crate::tools::cache::{CacheDeleteParams, CacheGetParams, CacheListParams, delete_impl, get_impl, list_impl};
use crate::tools::sw_fetch::{SwFetchParams, fetch_impl};
use crate::tools::sw_message::{SwMessageParams, message_impl};
use crate::tools::sw_register::{SwRegisterParams, register_impl};
use crate::tools::sw_status::status_impl;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use swcache_core::{AppConfig, CacheDb, Registration};

/// The main MCP server handler for swcache.
#[derive(Clone)]
pub struct SwCacheServer {
    tool_router: ToolRouter<Self>,
    registration: Arc<Registration>,
    db: CacheDb,
    config: Arc<AppConfig>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl SwCacheServer {
    /// Create a new server handler.
    pub fn new(registration: Arc<Registration>, db: CacheDb, config: Arc<AppConfig>) -> Self {
        Self { tool_router: Self::tool_router(), registration, db, config }
    }

    #[tool(
        description = "Install a controller version: precache its manifest atomically, then activate it and delete stale stores. Defaults come from the server configuration."
    )]
    async fn sw_register(&self, params: Parameters<SwRegisterParams>) -> Result<CallToolResult, McpError> {
        register_impl(&self.registration, &self.config, params.0).await
    }

    /// Fetch through the active controller.
    ///
    /// Navigations go network-first with a cached fallback; subresources are
    /// served cache-first.
    #[tool(
        description = "Fetch a URL through the active controller. mode=navigate is network-first with offline fallback; other modes are cache-first."
    )]
    async fn sw_fetch(&self, params: Parameters<SwFetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(&self.registration, params.0).await
    }

    #[tool(description = "Post a page message to the controller. {\"type\": \"SKIP_WAITING\"} activates a waiting version.")]
    async fn sw_message(&self, params: Parameters<SwMessageParams>) -> Result<CallToolResult, McpError> {
        message_impl(&self.registration, params.0).await
    }

    #[tool(description = "Report the active and waiting controller versions and their lifecycle states.")]
    async fn sw_status(&self) -> Result<CallToolResult, McpError> {
        status_impl(&self.registration).await
    }

    #[tool(description = "List store names, or the entries of one store when cache_name is given.")]
    async fn cache_list(&self, params: Parameters<CacheListParams>) -> Result<CallToolResult, McpError> {
        list_impl(&self.db, params.0).await
    }

    #[tool(description = "Retrieve a stored response by store name and request URL.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(&self.db, params.0).await
    }

    #[tool(description = "Delete one stored entry by URL, or the whole store when url is omitted.")]
    async fn cache_delete(&self, params: Parameters<CacheDeleteParams>) -> Result<CallToolResult, McpError> {
        delete_impl(&self.db, params.0).await
    }
}

impl ServerHandler for SwCacheServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "swcache".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{fixture, test_config};

    #[tokio::test]
    async fn test_tools_listed() {
        let (registration, db, _network) = fixture().await;
        let server = SwCacheServer::new(registration, db, Arc::new(test_config()));

        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();

        assert_eq!(
            names,
            vec!["cache_delete", "cache_get", "cache_list", "sw_fetch", "sw_message", "sw_register", "sw_status"]
        );
    }

    #[tokio::test]
    async fn test_server_info_name() {
        let (registration, db, _network) = fixture().await;
        let server = SwCacheServer::new(registration, db, Arc::new(test_config()));

        assert_eq!(server.get_info().server_info.name, "swcache");
    }
}
