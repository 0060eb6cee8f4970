//! AList file search tool.

use async_trait::async_trait;
use rmcp::model::Content;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::client::AlistClient;
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

fn default_parent() -> String {
    "/".to_string()
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    10
}

/// Parameters for the AList search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AlistSearchParams {
    /// The keywords for searching. This is a required parameter.
    pub keywords: String,

    /// The directory to search within. Optional, defaults to the root directory.
    #[serde(default = "default_parent")]
    pub parent: String,

    /// The type of search. Optional, defaults to 0. 0-All, 1-Folders, 2-Files.
    #[serde(default)]
    pub scope: u8,

    /// The page number for results. Optional, defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,

    /// The number of results per page. Optional, defaults to 10.
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// The password for accessing protected directories. Optional, defaults to none.
    #[serde(default)]
    pub password: String,
}

/// Searches files on an AList server.
pub struct AlistSearchTool;

impl AlistSearchTool {
    fn client(ctx: &ToolContext) -> Result<&AlistClient, ToolError> {
        ctx.alist()
            .ok_or_else(|| ToolError::upstream("AList server is not configured"))
    }
}

#[async_trait]
impl ToolDefinition for AlistSearchTool {
    type Params = AlistSearchParams;

    const NAME: &'static str = "Alist Search";
    const DESCRIPTION: &'static str = "Search files in AList";

    async fn init(&self, ctx: &ToolContext) -> Result<(), ToolError> {
        match ctx.alist() {
            Some(client) => client.login(ctx.http()).await,
            None => {
                warn!("Skipping AList login: no server configured");
                Ok(())
            }
        }
    }

    #[instrument(skip_all, fields(keywords = %params.keywords))]
    async fn execute(
        &self,
        params: AlistSearchParams,
        ctx: &ToolContext,
    ) -> Result<Vec<Content>, ToolError> {
        let client = Self::client(ctx)?;
        let token = client.token().await.unwrap_or_default();

        info!("Searching AList under {}", params.parent);

        let result: serde_json::Value = ctx
            .http()
            .post(client.url("/api/fs/search"))
            .header(reqwest::header::AUTHORIZATION, token)
            .json(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text =
            serde_json::to_string(&result).map_err(|e| ToolError::internal(e.to_string()))?;
        Ok(vec![Content::text(text)])
    }
}
