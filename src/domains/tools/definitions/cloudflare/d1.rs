//! Cloudflare D1 query tool.
//!
//! Posts the statement and its bound parameters to the D1 query endpoint and
//! returns the API's JSON response verbatim.

use std::fmt;

use async_trait::async_trait;
use rmcp::model::Content;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Default Cloudflare API root.
pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Credentials and database address for the D1 API.
#[derive(Clone)]
pub struct D1Credentials {
    pub api_base: String,
    pub account_id: String,
    pub database_id: String,
    pub api_token: String,
}

impl D1Credentials {
    /// Read `CLOUDFLARE_ACCOUNT_ID`, `CLOUDFLARE_D1_DB_UUID` and
    /// `CLOUDFLARE_API_TOKEN`. Returns `None` unless all three are set.
    pub fn from_env() -> Option<Self> {
        let account_id = std::env::var("CLOUDFLARE_ACCOUNT_ID").ok()?;
        let database_id = std::env::var("CLOUDFLARE_D1_DB_UUID").ok()?;
        let api_token = std::env::var("CLOUDFLARE_API_TOKEN").ok()?;
        let api_base =
            std::env::var("CLOUDFLARE_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        Some(Self {
            api_base,
            account_id,
            database_id,
            api_token,
        })
    }

    /// The query endpoint for the configured database.
    pub fn query_url(&self) -> String {
        format!(
            "{}/accounts/{}/d1/database/{}/query",
            self.api_base.trim_end_matches('/'),
            self.account_id,
            self.database_id
        )
    }
}

/// Custom Debug implementation to redact secrets from logs.
impl fmt::Debug for D1Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("D1Credentials")
            .field("api_base", &self.api_base)
            .field("account_id", &self.account_id)
            .field("database_id", &self.database_id)
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}

/// Parameters for the D1 query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct D1Params {
    /// The SQL query to execute. This should be a valid SQL string.
    pub sql: String,

    /// List of parameters to be bound to the SQL query. Use this to pass
    /// dynamic values safely and prevent SQL injection.
    #[serde(default)]
    pub params: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct QueryBody<'a> {
    sql: &'a str,
    params: &'a [serde_json::Value],
}

/// Executes SQL in a Cloudflare D1 database.
pub struct D1QueryTool;

#[async_trait]
impl ToolDefinition for D1QueryTool {
    type Params = D1Params;

    const NAME: &'static str = "D1";
    const DESCRIPTION: &'static str = "Execute SQL in the CloudFlare D1 database";

    #[instrument(skip_all)]
    async fn execute(&self, params: D1Params, ctx: &ToolContext) -> Result<Vec<Content>, ToolError> {
        let creds = ctx
            .d1()
            .ok_or_else(|| ToolError::upstream("Cloudflare D1 credentials are not configured"))?;

        info!("Running D1 query with {} bound parameters", params.params.len());

        let response: serde_json::Value = ctx
            .http()
            .post(creds.query_url())
            .bearer_auth(&creds.api_token)
            .json(&QueryBody {
                sql: &params.sql,
                params: &params.params,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text = serde_json::to_string(&response)
            .map_err(|e| ToolError::internal(e.to_string()))?;
        Ok(vec![Content::text(text)])
    }
}
