//! Tool definitions module.
//!
//! Each tool is defined in its own file; related tools live in a group
//! directory with its own `register` function. [`register_all`] is the
//! registration table: a tool listed here is part of the server.

pub mod alist;
pub mod cloudflare;
pub mod fetch;
pub mod system_info;
pub mod time;

pub use fetch::{FetchParams, FetchTool};
pub use system_info::SystemInfoTool;
pub use time::TimeTool;

use super::registry::ToolRegistryBuilder;

/// Register every tool shipped with the server.
pub fn register_all(builder: ToolRegistryBuilder) -> ToolRegistryBuilder {
    builder
        .register(TimeTool)
        .register(SystemInfoTool)
        .register(FetchTool)
        .group("cloudflare", cloudflare::register)
        .group("alist", alist::register)
}
