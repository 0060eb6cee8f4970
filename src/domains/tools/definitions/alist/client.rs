//! Authenticated AList API client.
//!
//! Logs in once at startup and keeps the session token for later calls.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::domains::tools::ToolError;

/// AList client shared through the tool context.
pub struct AlistClient {
    endpoint: String,
    username: String,
    password: String,
    token: RwLock<Option<String>>,
}

/// Envelope of every AList API response.
#[derive(Debug, Deserialize)]
pub struct AlistResponse<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginData {
    token: String,
}

impl AlistClient {
    pub fn new(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            token: RwLock::new(None),
        }
    }

    /// Read `ALIST_SERVER`, `ALIST_USERNAME` and `ALIST_PASSWORD`.
    ///
    /// Returns `None` when no server is configured.
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var("ALIST_SERVER").ok()?;
        let username = std::env::var("ALIST_USERNAME").unwrap_or_default();
        let password = std::env::var("ALIST_PASSWORD").unwrap_or_default();
        Some(Self::new(endpoint, username, password))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build a URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    /// Log in and store the session token.
    pub async fn login(&self, http: &reqwest::Client) -> Result<(), ToolError> {
        let response: AlistResponse<LoginData> = http
            .post(self.url("/api/auth/login"))
            .json(&LoginRequest {
                username: &self.username,
                password: &self.password,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let data = match response {
            AlistResponse {
                code: 200,
                data: Some(data),
                ..
            } => data,
            AlistResponse { code, message, .. } => {
                return Err(ToolError::upstream(format!(
                    "AList login failed ({}): {}",
                    code, message
                )));
            }
        };

        *self.token.write().await = Some(data.token);
        info!("Logged in to AList at {}", self.endpoint);
        Ok(())
    }

    /// The current session token, if logged in.
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }
}

/// Custom Debug implementation to redact secrets from logs.
impl fmt::Debug for AlistClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlistClient")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
