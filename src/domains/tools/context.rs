//! Shared backend handles passed to every tool.
//!
//! Built once at startup and shared read-mostly across concurrent calls.
//! Tool modules read their own credentials from the environment; the core
//! only assembles the result.

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use super::definitions::alist::AlistClient;
use super::definitions::cloudflare::D1Credentials;
use super::error::ToolError;

/// User agent sent by tools that talk HTTP.
pub const USER_AGENT: &str = concat!("toolbox-mcp-server/", env!("CARGO_PKG_VERSION"));

/// Context object handed to tool `init` and `execute`.
#[derive(Clone)]
pub struct ToolContext {
    http: reqwest::Client,
    d1: Option<D1Credentials>,
    alist: Option<Arc<AlistClient>>,
}

impl ToolContext {
    /// Create a context with only an HTTP client.
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            d1: None,
            alist: None,
        }
    }

    /// Build the context from environment variables.
    pub fn from_env() -> Result<Self, ToolError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ToolError::internal(format!("Failed to build HTTP client: {}", e)))?;

        let mut ctx = Self::new(http);

        match D1Credentials::from_env() {
            Some(creds) => {
                info!("Cloudflare D1 credentials loaded from environment");
                ctx.d1 = Some(creds);
            }
            None => warn!(
                "Cloudflare D1 credentials not set - the d1_query tool will report an error \
                 (set CLOUDFLARE_ACCOUNT_ID, CLOUDFLARE_D1_DB_UUID, CLOUDFLARE_API_TOKEN)"
            ),
        }

        match AlistClient::from_env() {
            Some(client) => {
                info!("AList server configured: {}", client.endpoint());
                ctx.alist = Some(Arc::new(client));
            }
            None => warn!("ALIST_SERVER not set - the alist_search tool will report an error"),
        }

        Ok(ctx)
    }

    /// Attach Cloudflare D1 credentials.
    pub fn with_d1(mut self, creds: D1Credentials) -> Self {
        self.d1 = Some(creds);
        self
    }

    /// Attach an AList client.
    pub fn with_alist(mut self, client: AlistClient) -> Self {
        self.alist = Some(Arc::new(client));
        self
    }

    /// Shared HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn d1(&self) -> Option<&D1Credentials> {
        self.d1.as_ref()
    }

    pub fn alist(&self) -> Option<&AlistClient> {
        self.alist.as_deref()
    }
}

impl fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolContext")
            .field("d1", &self.d1)
            .field("alist", &self.alist)
            .finish()
    }
}
