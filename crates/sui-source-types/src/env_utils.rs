//! Environment variable parsing utilities.
//!
//! Replaces the repeated pattern
//!
//! ```ignore
//! std::env::var("VAR_NAME")
//!     .ok()
//!     .and_then(|v| v.parse::<u64>().ok())
//!     .unwrap_or(default_value)
//! ```
//!
//! Only the binary reads the environment; library code receives an explicit
//! configuration record built from these helpers.
//!
//! # Example
//!
//! ```
//! use sui_source_types::env_utils::{env_string_or, env_var_or};
//!
//! let timeout: u64 = env_var_or("SUI_SOURCE_DOC_TIMEOUT", 30);
//! let url = env_string_or("SUI_SOURCE_DOC_URL", "https://fullnode.mainnet.sui.io/");
//! assert_eq!(timeout, 30);
//! assert_eq!(url, "https://fullnode.mainnet.sui.io/");
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable with a default value.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// Check if an environment variable is set to a truthy value, with a default
/// when it is unset.
///
/// `"1"`, `"true"`, `"yes"` and `"on"` (case-insensitive) are truthy.
pub fn env_bool_or(key: &str, default: bool) -> bool {
    match std::env::var(key).ok() {
        Some(v) => matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        None => default,
    }
}

/// Get an environment variable as a string with a default value.
///
/// Blank values count as unset.
pub fn env_string_or(key: &str, default: &str) -> String {
    env_string(key).unwrap_or_else(|| default.to_string())
}

/// Get a non-blank environment variable as a string.
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
