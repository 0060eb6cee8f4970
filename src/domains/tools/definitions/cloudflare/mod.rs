//! Cloudflare tools.
//!
//! - `d1`: run SQL against a Cloudflare D1 database

pub mod d1;

pub use d1::{D1Credentials, D1Params, D1QueryTool};

use crate::domains::tools::ToolRegistryBuilder;

/// Register the Cloudflare tools.
pub fn register(builder: ToolRegistryBuilder) -> ToolRegistryBuilder {
    builder.register(D1QueryTool)
}
