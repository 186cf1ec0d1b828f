//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::handoff::SearchSession;
use crate::state::AppState;
use crate::tools::{
    ProductResolveParams, ProductSearchParams, ProductViewParams, product_resolve::resolve_impl,
    product_search::search_impl, product_view::view_impl,
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
use tokio::sync::Mutex;

/// The main MCP server handler for hollow.
///
/// One handler serves one client connection, so the search session lives
/// here rather than in the shared [`AppState`].
#[derive(Clone)]
pub struct HollowMcpServer {
    state: AppState,
    session: Arc<Mutex<SearchSession>>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl HollowMcpServer {
    /// Create a new server handler.
    pub fn new(state: AppState) -> Self {
        Self { state, session: Arc::new(Mutex::new(SearchSession::new())), tool_router: Self::tool_router() }
    }

    /// Search for products.
    ///
    /// Upstream failures are not errors here: they produce an empty list.
    #[tool(
        description = "Search for products. Returns the result list; pass a result's index to product_resolve to load its details."
    )]
    async fn product_search(&self, params: Parameters<ProductSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.state, &self.session, params.0).await
    }

    /// Load, merge and cache the details for one listed result.
    #[tool(
        description = "Load full details for a result from the last product_search and cache them. Returns the product page URL once the details are stored."
    )]
    async fn product_resolve(&self, params: Parameters<ProductResolveParams>) -> Result<CallToolResult, McpError> {
        resolve_impl(&self.state, &self.session, params.0).await
    }

    /// Read a cached product.
    #[tool(
        description = "Read a cached product by product_id, including sellers, specifications, ratings and reviews. Fails with NOT_FOUND if it was never resolved."
    )]
    async fn product_view(&self, params: Parameters<ProductViewParams>) -> Result<CallToolResult, McpError> {
        view_impl(&self.state, &self.session, params.0).await
    }
}

impl ServerHandler for HollowMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "hollow".into(),
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
