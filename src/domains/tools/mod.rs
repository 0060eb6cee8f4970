//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are executable functions that can be called by MCP clients to perform
//! specific actions or computations.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool, groups in subdirectories)
//! - `handlers.rs` - The `ToolDefinition` contract and its object-safe adapter
//! - `registry.rs` - Registration table, duplicate detection, one-time init
//! - `router.rs` - Name resolution and invocation
//! - `context.rs` - Shared backend handles passed to every tool
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Define a params struct and implement `ToolDefinition`
//! 3. Add it to `definitions::register_all` (or to its group's `register`)

mod context;
pub mod definitions;
mod error;
mod handlers;
mod registry;
mod router;

#[cfg(test)]
pub(crate) mod testing;

pub use context::{ToolContext, USER_AGENT};
pub use error::{DiscoveryError, ToolError};
pub use handlers::{DEFAULT_HANDLER, NoParams, ToolDefinition, ToolModule};
pub use registry::{RegistryEntry, ToolRegistry, ToolRegistryBuilder};
pub use router::ToolRouter;
