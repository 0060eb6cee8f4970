//! Tool module contract.
//!
//! A tool is a type implementing [`ToolDefinition`]: it names itself, declares
//! a typed parameter struct (from which the input schema is derived), and
//! provides an async `execute`. The registry stores tools behind the
//! object-safe [`ToolModule`] trait, which validates the generic argument map
//! into the typed parameters before anything runs.

use async_trait::async_trait;
use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, Content, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::warn;

use super::context::ToolContext;
use super::error::ToolError;

/// Name of the handler every tool exposes.
pub const DEFAULT_HANDLER: &str = "handler";

/// Parameters for tools that take no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoParams {}

/// Trait implemented by every tool.
#[async_trait]
pub trait ToolDefinition: Send + Sync + 'static {
    /// Typed request, validated from the call's argument map.
    type Params: DeserializeOwned + JsonSchema + Send + 'static;

    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// One-time initialization, run by the registry before the tool is callable.
    async fn init(&self, _ctx: &ToolContext) -> Result<(), ToolError> {
        Ok(())
    }

    /// Run the tool.
    ///
    /// Returning [`ToolError::Upstream`] produces an error result for the
    /// client; any other error escapes to the transport.
    async fn execute(
        &self,
        params: Self::Params,
        ctx: &ToolContext,
    ) -> Result<Vec<Content>, ToolError>;

    /// Create a Tool model for this tool (metadata).
    fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<Self::Params>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

/// Object-safe view of a registered tool.
#[async_trait]
pub trait ToolModule: Send + Sync {
    /// The tool's descriptor.
    fn descriptor(&self) -> Tool;

    /// Whether the module exposes a handler under this name.
    fn has_handler(&self, handler: &str) -> bool {
        handler == DEFAULT_HANDLER
    }

    /// Run the module's one-time initialization.
    async fn init(&self, ctx: &ToolContext) -> Result<(), ToolError>;

    /// Validate `arguments` and invoke `handler`.
    async fn call(
        &self,
        handler: &str,
        arguments: JsonObject,
        ctx: &ToolContext,
    ) -> Result<CallToolResult, ToolError>;
}

/// Adapter from a [`ToolDefinition`] to a [`ToolModule`].
pub(crate) struct Registered<T>(pub(crate) T);

#[async_trait]
impl<T: ToolDefinition> ToolModule for Registered<T> {
    fn descriptor(&self) -> Tool {
        T::to_tool()
    }

    async fn init(&self, ctx: &ToolContext) -> Result<(), ToolError> {
        self.0.init(ctx).await
    }

    async fn call(
        &self,
        handler: &str,
        arguments: JsonObject,
        ctx: &ToolContext,
    ) -> Result<CallToolResult, ToolError> {
        if !self.has_handler(handler) {
            return Err(ToolError::handler_missing(T::NAME, handler));
        }

        let params: T::Params = serde_json::from_value(serde_json::Value::Object(arguments))
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;

        match self.0.execute(params, ctx).await {
            Ok(content) => Ok(CallToolResult::success(content)),
            Err(ToolError::Upstream(message)) => {
                warn!(tool = T::NAME, "Upstream failure: {}", message);
                Ok(CallToolResult::error(vec![Content::text(message)]))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::testing::{EchoTool, FailingTool, test_context};

    #[test]
    fn test_descriptor_schema_lists_params() {
        let tool = EchoTool::to_tool();
        assert_eq!(tool.name, "echo");
        let properties = tool
            .input_schema
            .get("properties")
            .and_then(|p| p.as_object())
            .expect("schema has properties");
        assert!(properties.contains_key("message"));
    }

    #[tokio::test]
    async fn test_call_validates_arguments() {
        let module = Registered(EchoTool);
        let err = module
            .call(DEFAULT_HANDLER, JsonObject::new(), &test_context())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_call_unknown_handler() {
        let module = Registered(EchoTool);
        let err = module
            .call("run", JsonObject::new(), &test_context())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::HandlerMissing { .. }));
    }

    #[tokio::test]
    async fn test_upstream_failure_becomes_error_content() {
        let module = Registered(FailingTool::upstream());
        let result = module
            .call(DEFAULT_HANDLER, JsonObject::new(), &test_context())
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
    }

    #[tokio::test]
    async fn test_other_failures_escape() {
        let module = Registered(FailingTool::internal());
        let result = module
            .call(DEFAULT_HANDLER, JsonObject::new(), &test_context())
            .await;
        assert!(matches!(result, Err(ToolError::Internal(_))));
    }
}
