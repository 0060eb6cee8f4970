//! Tool Router - resolves a tool name and invokes its handler.
//!
//! Resolution and argument errors (`NotFound`, `HandlerMissing`,
//! `InvalidArguments`) become error results here. Everything else is returned
//! as `Err` so the transport decides how to report it.

use std::sync::Arc;

use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use tracing::{info, instrument, warn};

use super::context::ToolContext;
use super::error::ToolError;
use super::registry::ToolRegistry;

/// Dispatches tool calls against a frozen registry.
#[derive(Clone)]
pub struct ToolRouter {
    registry: Arc<ToolRegistry>,
    ctx: Arc<ToolContext>,
}

impl ToolRouter {
    pub fn new(registry: Arc<ToolRegistry>, ctx: Arc<ToolContext>) -> Self {
        Self { registry, ctx }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Descriptors of every registered tool.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.registry.list_descriptors()
    }

    /// Call a tool's default handler.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ToolError> {
        let handler = self
            .registry
            .lookup(name)
            .map(|entry| entry.handler_name())
            .unwrap_or(super::handlers::DEFAULT_HANDLER);
        self.dispatch_method(name, handler, arguments).await
    }

    /// Call a named handler on a tool.
    #[instrument(skip(self, arguments))]
    pub async fn dispatch_method(
        &self,
        name: &str,
        method: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ToolError> {
        match self.invoke(name, method, arguments).await {
            Err(e) if e.is_request_error() => {
                warn!("Rejected call to {}: {}", name, e);
                Ok(CallToolResult::error(vec![Content::text(format!(
                    "Failed to call tool {}: {}",
                    name, e
                ))]))
            }
            other => other,
        }
    }

    async fn invoke(
        &self,
        name: &str,
        method: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ToolError> {
        let entry = self
            .registry
            .lookup(name)
            .ok_or_else(|| ToolError::not_found(name))?;

        let module = entry.module();
        if !module.has_handler(method) {
            return Err(ToolError::handler_missing(name, method));
        }

        info!("Calling tool {}", name);
        module
            .call(method, arguments.unwrap_or_default(), &self.ctx)
            .await
    }
}
