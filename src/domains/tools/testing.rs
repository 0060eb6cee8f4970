//! Fixture tools shared by the registry, router and transport tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use rmcp::model::Content;
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Notify;

use super::context::ToolContext;
use super::error::ToolError;
use super::handlers::{NoParams, ToolDefinition};

pub fn test_context() -> ToolContext {
    ToolContext::new(reqwest::Client::new())
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EchoParams {
    /// Text to send back.
    pub message: String,
}

/// Returns its `message` argument.
pub struct EchoTool;

#[async_trait]
impl ToolDefinition for EchoTool {
    type Params = EchoParams;
    const NAME: &'static str = "echo";
    const DESCRIPTION: &'static str = "Echo the message back";

    async fn execute(
        &self,
        params: EchoParams,
        _ctx: &ToolContext,
    ) -> Result<Vec<Content>, ToolError> {
        Ok(vec![Content::text(params.message)])
    }
}

/// Second module claiming the name `echo`.
pub struct ShadowEchoTool {
    pub inits: Arc<AtomicUsize>,
}

#[async_trait]
impl ToolDefinition for ShadowEchoTool {
    type Params = NoParams;
    const NAME: &'static str = "echo";
    const DESCRIPTION: &'static str = "Conflicts with echo";

    async fn init(&self, _ctx: &ToolContext) -> Result<(), ToolError> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn execute(&self, _params: NoParams, _ctx: &ToolContext) -> Result<Vec<Content>, ToolError> {
        Ok(vec![Content::text("shadow")])
    }
}

/// Counts init calls and can be told to fail them.
pub struct CountingTool {
    pub inits: Arc<AtomicUsize>,
    pub fail_init: bool,
}

#[async_trait]
impl ToolDefinition for CountingTool {
    type Params = NoParams;
    const NAME: &'static str = "counting";
    const DESCRIPTION: &'static str = "Counts initializations";

    async fn init(&self, _ctx: &ToolContext) -> Result<(), ToolError> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        if self.fail_init {
            return Err(ToolError::upstream("backend refused login"));
        }
        Ok(())
    }

    async fn execute(&self, _params: NoParams, _ctx: &ToolContext) -> Result<Vec<Content>, ToolError> {
        Ok(vec![Content::text(self.inits.load(Ordering::SeqCst).to_string())])
    }
}

#[derive(Debug, Clone, Copy)]
enum Failure {
    Upstream,
    Internal,
    Panic,
}

/// Fails every call in a configurable way.
pub struct FailingTool {
    failure: Failure,
}

impl FailingTool {
    pub fn upstream() -> Self {
        Self {
            failure: Failure::Upstream,
        }
    }

    pub fn internal() -> Self {
        Self {
            failure: Failure::Internal,
        }
    }

    pub fn panicking() -> Self {
        Self {
            failure: Failure::Panic,
        }
    }
}

#[async_trait]
impl ToolDefinition for FailingTool {
    type Params = NoParams;
    const NAME: &'static str = "failing";
    const DESCRIPTION: &'static str = "Always fails";

    async fn execute(&self, _params: NoParams, _ctx: &ToolContext) -> Result<Vec<Content>, ToolError> {
        match self.failure {
            Failure::Upstream => Err(ToolError::upstream("HTTP error: 502 Bad Gateway")),
            Failure::Internal => Err(ToolError::internal("database handle poisoned")),
            Failure::Panic => panic!("tool blew up"),
        }
    }
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Never completes; records when its future is dropped.
#[derive(Clone, Default)]
pub struct StallTool {
    pub started: Arc<Notify>,
    pub dropped: Arc<AtomicBool>,
}

#[async_trait]
impl ToolDefinition for StallTool {
    type Params = NoParams;
    const NAME: &'static str = "stall";
    const DESCRIPTION: &'static str = "Waits forever";

    async fn execute(&self, _params: NoParams, _ctx: &ToolContext) -> Result<Vec<Content>, ToolError> {
        let _flag = DropFlag(self.dropped.clone());
        self.started.notify_one();
        let content: Vec<Content> = std::future::pending().await;
        Ok(content)
    }
}
