//! AList tools.
//!
//! - `client`: authenticated API client, logged in once at startup
//! - `search`: file search

pub mod client;
pub mod search;

pub use client::AlistClient;
pub use search::{AlistSearchParams, AlistSearchTool};

use crate::domains::tools::ToolRegistryBuilder;

/// Register the AList tools.
pub fn register(builder: ToolRegistryBuilder) -> ToolRegistryBuilder {
    builder.register(AlistSearchTool)
}
