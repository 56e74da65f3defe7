//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use jidanjia_client::{MissevanClient, MissevanError};
use jidanjia_core::AppConfig;

use crate::tools::{
    DramaAnalyzeParams, DramaBatchAnalyzeParams, DramaLookupParams, drama_analyze::analyze_impl,
    drama_batch_analyze::batch_analyze_impl, drama_lookup::lookup_impl,
};

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

/// The main MCP server handler for jidanjia.
#[derive(Clone)]
pub struct JidanjiaServer {
    config: Arc<AppConfig>,
    client: MissevanClient,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl JidanjiaServer {
    /// Create a new server handler.
    pub fn new(config: AppConfig) -> Result<Self, MissevanError> {
        let client = MissevanClient::from_app_config(&config)?;
        Ok(Self { config: Arc::new(config), client, tool_router: Self::tool_router() })
    }

    /// Analyze one paid drama listing.
    ///
    /// No network requests are made.
    #[tool(
        description = "Analyze one paid audio-drama listing. Returns episode counts, producers, category, cover date and per-episode prices in yuan."
    )]
    async fn drama_analyze(&self, params: Parameters<DramaAnalyzeParams>) -> Result<CallToolResult, McpError> {
        analyze_impl(params.0).await
    }

    /// Analyze many listings with bounded concurrency.
    #[tool(
        description = "Analyze many listings at once. Returns one result per listing (in input order) with a status, plus a summary."
    )]
    async fn drama_batch_analyze(&self, params: Parameters<DramaBatchAnalyzeParams>) -> Result<CallToolResult, McpError> {
        batch_analyze_impl(&self.config, params.0).await
    }

    /// Look a series up on the platform and analyze every priced season.
    #[tool(
        description = "Search Missevan for a drama series by name and analyze every priced season. Season suffixes in the name are ignored."
    )]
    async fn drama_lookup(&self, params: Parameters<DramaLookupParams>) -> Result<CallToolResult, McpError> {
        lookup_impl(&self.client, params.0).await
    }
}

impl ServerHandler for JidanjiaServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-jidanjia".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Per-episode pricing for paid Missevan audio dramas. Prices are in yuan (10 diamonds = 1 yuan); \
                 a per-episode price of 0 means the episode count was unknown or zero."
                    .into(),
            ),
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
