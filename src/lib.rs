//! MCP tool server library.
//!
//! A Model Context Protocol server that exposes a set of independently
//! registered tools and a small catalog of text resources over SSE sessions
//! (or stdio).
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the server and its transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: tool registry, dispatcher and tool modules
//!   - **resources**: read-only text resources
//!
//! # Example
//!
//! ```rust,no_run
//! use toolbox_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::from_config(config.clone()).await?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
