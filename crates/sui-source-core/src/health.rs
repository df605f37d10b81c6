//! Server health report.

use serde::{Deserialize, Serialize};
use tracing::warn;

use sui_transport::network::infer_network_from_url;

use crate::decompiler::RevelaDecompiler;

pub const SERVER_NAME: &str = "sui-source-mcp";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// `healthy` when the decompiler probe passed, `unhealthy` otherwise.
    pub status: String,
    pub revela_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub sui_rpc_url: String,
    /// `mainnet`, `testnet` or `devnet` when recognisable from the RPC url.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    pub metadata_configured: bool,
    pub server: String,
    pub version: String,
}

impl HealthReport {
    /// Probe the decompiler and describe the server around it.
    pub fn check(decompiler: &RevelaDecompiler, rpc_url: &str, metadata_configured: bool) -> Self {
        let probe = decompiler.probe();
        if let Err(e) = &probe {
            warn!(binary = %decompiler.binary().display(), error = %e, "decompiler probe failed");
        }
        let revela_available = probe.is_ok();
        Self {
            status: if revela_available { "healthy" } else { "unhealthy" }.to_string(),
            revela_available,
            error: probe.err().map(|e| e.to_string()),
            sui_rpc_url: rpc_url.to_string(),
            network: infer_network_from_url(rpc_url).map(str::to_string),
            metadata_configured,
            server: SERVER_NAME.to_string(),
            version: SERVER_VERSION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_missing_decompiler_is_unhealthy() {
        let dir = tempfile::tempdir().unwrap();
        let decompiler = RevelaDecompiler::new(dir.path().join("no-revela"), Duration::from_secs(1));

        let report = HealthReport::check(&decompiler, "http://localhost:9000", false);
        assert_eq!(report.status, "unhealthy");
        assert!(!report.revela_available);
        assert!(report.error.is_some());
        assert_eq!(report.sui_rpc_url, "http://localhost:9000");
        assert!(report.network.is_none());
        assert_eq!(report.server, "sui-source-mcp");
    }

    #[cfg(unix)]
    #[test]
    fn test_working_decompiler_is_healthy() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("revela");
        std::fs::write(&bin, "#!/bin/sh\necho usage\n").unwrap();
        std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();

        let report = HealthReport::check(
            &RevelaDecompiler::new(bin, Duration::from_secs(1)),
            "https://fullnode.testnet.sui.io/",
            true,
        );
        assert_eq!(report.status, "healthy");
        assert_eq!(report.network.as_deref(), Some("testnet"));
        assert!(report.error.is_none());

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("error").is_none());
    }
}
