//! Resources domain module.
//!
//! Resources are static named text blobs served read-only, unrelated to
//! tool execution.
//!
//! ## Architecture
//!
//! - `registry.rs` - The static resource table
//! - `catalog.rs` - Listing and URI-based reads
//!
//! ## Adding a New Resource
//!
//! Add an entry to `get_all_resources()` in `registry.rs`.

mod catalog;
mod error;
mod registry;

pub use catalog::{ResourceCatalog, resource_key};
pub use error::ResourceError;
pub use registry::{ResourceEntry, get_all_resources};
