//! MCP tool implementations.
//!
//! - `inputs`: deserializable tool inputs
//! - `handlers`: the tool handlers, run off the async runtime

pub(crate) mod handlers;
pub mod inputs;

pub use inputs::PackageIdInput;
