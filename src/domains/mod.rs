//! Domains module containing business logic organized by bounded contexts.
//!
//! - **tools**: the plugin registry, the dispatcher and the tool modules
//! - **resources**: static text resources served read-only

pub mod resources;
pub mod tools;
