//! Current server time tool.

use async_trait::async_trait;
use rmcp::model::Content;

use crate::domains::tools::{NoParams, ToolContext, ToolDefinition, ToolError};

/// Format used for the reported time.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Returns the server's local time.
pub struct TimeTool;

#[async_trait]
impl ToolDefinition for TimeTool {
    type Params = NoParams;

    const NAME: &'static str = "Time";
    const DESCRIPTION: &'static str = "Retrieve the current server time";

    async fn execute(&self, _params: NoParams, _ctx: &ToolContext) -> Result<Vec<Content>, ToolError> {
        let now = chrono::Local::now().format(TIME_FORMAT).to_string();
        Ok(vec![Content::text(now)])
    }
}
