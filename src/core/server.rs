//! MCP Server implementation and lifecycle management.
//!
//! `McpServer` ties the frozen tool registry and the resource catalog to the
//! protocol. The SSE transport calls the inherent methods below; the stdio
//! transport goes through the rmcp `ServerHandler` implementation. Both end up
//! in the same place.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::*,
    service::RequestContext,
};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, instrument};

use super::config::Config;
use super::error::Result;
use crate::domains::{
    resources::{ResourceCatalog, ResourceError},
    tools::{ToolContext, ToolRegistry, ToolRouter},
};

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Dispatcher over the tool registry.
    router: ToolRouter,

    /// Static text resources.
    resources: Arc<ResourceCatalog>,
}

impl McpServer {
    /// Create a server over an already built registry.
    pub fn new(config: Config, registry: ToolRegistry, ctx: ToolContext) -> Self {
        Self {
            config: Arc::new(config),
            router: ToolRouter::new(Arc::new(registry), Arc::new(ctx)),
            resources: Arc::new(ResourceCatalog::from_registry()),
        }
    }

    /// Build the tool context from the environment, register and initialise
    /// every tool, and create the server.
    ///
    /// Fails if two tools share a name or a tool cannot initialise.
    pub async fn from_config(config: Config) -> Result<Self> {
        let ctx = ToolContext::from_env()?;
        let registry = ToolRegistry::discover(&ctx).await?;
        info!("Tools available: {}", registry.tool_names().join(", "));
        Ok(Self::new(config, registry, ctx))
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the tool dispatcher.
    pub fn router(&self) -> &ToolRouter {
        &self.router
    }

    /// Descriptors of every registered tool, in registration order.
    pub fn tools(&self) -> Vec<Tool> {
        self.router.list_tools()
    }

    /// Run a tool and always produce a result.
    ///
    /// Errors the dispatcher lets through, and panics in the tool handler,
    /// are reported as error content with only their message exposed. Both
    /// transports call tools through here.
    pub async fn execute_tool(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        let dispatch = AssertUnwindSafe(self.router.dispatch(name, arguments)).catch_unwind();
        match dispatch.await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                error!("Tool {} failed: {}", name, e);
                tool_failure(name, &e)
            }
            Err(_) => {
                error!("Tool {} panicked", name);
                tool_failure(name, &"tool handler panicked")
            }
        }
    }

    /// List every resource.
    pub fn resources(&self) -> Vec<Resource> {
        self.resources.list()
    }

    /// Read a resource by URI.
    pub fn resource(&self, uri: &str) -> std::result::Result<ReadResourceResult, ResourceError> {
        self.resources.read_resource(uri)
    }

    /// Capabilities advertised during `initialize`.
    pub fn capabilities(&self) -> ServerCapabilities {
        ServerCapabilities::builder()
            .enable_tools()
            .enable_resources()
            .build()
    }
}

/// Error result for a call that failed past the dispatcher.
fn tool_failure(name: &str, reason: &dyn std::fmt::Display) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!(
        "Failed to call tool {}: {}",
        name, reason
    ))])
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(self.config.server.instructions.clone()),
            capabilities: self.capabilities(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        Ok(self.execute_tool(&request.name, request.arguments).await)
    }

    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        Ok(ListResourcesResult {
            resources: self.resources(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ReadResourceResult, McpError> {
        info!("Reading resource: {}", request.uri);
        self.resource(&request.uri)
            .map_err(|e| McpError::resource_not_found(e.to_string(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::testing::{EchoTool, FailingTool, test_context};
    use serde_json::json;

    async fn server() -> McpServer {
        let ctx = test_context();
        let registry = ToolRegistry::builder()
            .register(EchoTool)
            .register(FailingTool::internal())
            .build(&ctx)
            .await
            .unwrap();
        McpServer::new(Config::default(), registry, ctx)
    }

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[tokio::test]
    async fn test_tools_listed_in_order() {
        let names: Vec<_> = server()
            .await
            .tools()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(names, vec!["echo", "failing"]);
    }

    #[tokio::test]
    async fn test_execute_tool_success() {
        let result = server()
            .await
            .execute_tool("echo", json!({ "message": "hi" }).as_object().cloned())
            .await;
        assert_ne!(result.is_error, Some(true));
        assert_eq!(text_of(&result), "hi");
    }

    #[tokio::test]
    async fn test_execute_tool_reports_internal_errors_as_results() {
        let result = server().await.execute_tool("failing", None).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            text_of(&result),
            "Failed to call tool failing: Internal error: database handle poisoned"
        );
    }

    #[tokio::test]
    async fn test_execute_tool_reports_panics_as_results() {
        let ctx = test_context();
        let registry = ToolRegistry::builder()
            .register(FailingTool::panicking())
            .register(EchoTool)
            .build(&ctx)
            .await
            .unwrap();
        let server = McpServer::new(Config::default(), registry, ctx);

        let result = server.execute_tool("failing", None).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            text_of(&result),
            "Failed to call tool failing: tool handler panicked"
        );

        let result = server
            .execute_tool("echo", json!({ "message": "after" }).as_object().cloned())
            .await;
        assert_eq!(text_of(&result), "after");
    }

    #[tokio::test]
    async fn test_resources() {
        let server = server().await;
        assert_eq!(server.resources().len(), 3);
        assert!(server.resource("file://greeting.txt").is_ok());
        assert!(matches!(
            server.resource("file://missing.txt"),
            Err(ResourceError::UnknownResource(_))
        ));
    }

    #[tokio::test]
    async fn test_get_info_capabilities() {
        let info = server().await.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
        assert!(info.capabilities.prompts.is_none());
    }
}
