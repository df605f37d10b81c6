//! Input structs for MCP tool handlers.

use serde::Deserialize;

/// Input of `get_source_code` and `get_project_info`.
#[derive(Debug, Deserialize, Clone)]
pub struct PackageIdInput {
    /// Package id, `0x`-prefixed hex. Passed to the ledger unchanged.
    pub package_id: String,
}
