//! Shared types for the sui-source workspace.
//!
//! This crate holds the small pieces every other crate needs and that would
//! otherwise create dependency cycles:
//!
//! - [`response`] - the [`ToolResponse`] envelope returned by every tool
//! - [`env_utils`] - typed environment variable parsing with defaults
//! - [`object_id`] - object id normalization for comparisons

pub mod env_utils;
pub mod object_id;
pub mod response;

pub use env_utils::{env_bool_or, env_string, env_string_or, env_var, env_var_or};
pub use object_id::{normalize_object_id, same_object_id, short_id};
pub use response::{extract_input, ToolMeta, ToolResponse};
