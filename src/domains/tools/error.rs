//! Tool-specific error types.

use thiserror::Error;

/// Errors that can occur while resolving or running a tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool is not registered.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// The tool exists but does not expose the requested handler.
    #[error("Tool {tool} does not have handler {handler}")]
    HandlerMissing { tool: String, handler: String },

    /// The arguments could not be validated against the tool's parameters.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// A call to the tool's backend failed.
    #[error("{0}")]
    Upstream(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "handler missing" error.
    pub fn handler_missing(tool: impl Into<String>, handler: impl Into<String>) -> Self {
        Self::HandlerMissing {
            tool: tool.into(),
            handler: handler.into(),
        }
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new upstream failure.
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the router turns this error into an error result itself.
    ///
    /// Everything else escapes to the session transport.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::HandlerMissing { .. } | Self::InvalidArguments(_)
        )
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Upstream(format!(
                "HTTP error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            )),
            None => Self::Upstream(format!("Request failed: {}", err)),
        }
    }
}

/// Errors raised while building the tool registry at startup.
///
/// All of these are fatal: the server refuses to start.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Two modules declared the same tool name.
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    /// A module's one-time initialization failed.
    #[error("Failed to initialize tool {tool}: {reason}")]
    InitFailed { tool: String, reason: String },
}
