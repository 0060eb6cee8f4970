//! Resource-specific error types.

use thiserror::Error;

/// Errors that can occur during resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The URI does not name a resource in the catalog.
    #[error("Unknown resource: {0}")]
    UnknownResource(String),
}

impl ResourceError {
    /// Create a new "unknown resource" error.
    pub fn unknown(uri: impl Into<String>) -> Self {
        Self::UnknownResource(uri.into())
    }
}
