//! MCP server for sui-source.
//!
//! [`ToolDispatcher`] owns the pipelines and routes the three tools
//! (`health_check`, `get_source_code`, `get_project_info`); the binary in
//! `main.rs` only adapts it to rmcp's stdio transport.

pub mod logging;
pub mod paths;
pub mod state;
pub mod tools;

pub use paths::SourcePaths;
pub use state::{ToolDispatcher, ToolResponse};
