//! Transport layer for the MCP server.
//!
//! - **SSE**: one event stream per session plus a POST endpoint for
//!   client messages - feature: `sse` (default)
//! - **STDIO**: standard input/output driven by rmcp - feature: `stdio`
//!
//! Both transports hand requests to the same `McpServer`.

mod config;
mod error;
mod service;

#[cfg(feature = "sse")]
pub mod jsonrpc;

#[cfg(feature = "sse")]
pub mod session;

#[cfg(feature = "sse")]
pub mod sse;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "sse")]
pub use config::SseConfig;

#[cfg(feature = "sse")]
pub use session::{SessionId, SessionManager};
