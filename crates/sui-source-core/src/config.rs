//! Runtime configuration.
//!
//! Built once by the binary (usually via [`SourceConfig::from_env`]) and
//! passed into every constructor. Library code never reads the environment.

use std::path::PathBuf;
use std::time::Duration;

use sui_source_types::{env_string, env_var_or};
use sui_transport::network::{default_rpc_endpoint, MAINNET_RPC};
use sui_transport::HttpTimeouts;

pub const ENV_RPC_URL: &str = "SUI_RPC_URL";
pub const ENV_NETWORK: &str = "SUI_NETWORK";
pub const ENV_OUTPUT_DIR: &str = "WORKDIR";
pub const ENV_METADATA_URL: &str = "SUI_METADATA_GRAPHQL_URL";
pub const ENV_DECOMPILER_BIN: &str = "REVELA_BIN";
pub const ENV_DECOMPILE_TIMEOUT_SECS: &str = "SUI_SOURCE_DECOMPILE_TIMEOUT_SECS";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "SUI_SOURCE_HTTP_TIMEOUT_SECS";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "SUI_SOURCE_CONNECT_TIMEOUT_SECS";
pub const ENV_ENRICH_CONCURRENCY: &str = "SUI_SOURCE_ENRICH_CONCURRENCY";

pub const DEFAULT_OUTPUT_DIR: &str = "/workdir";
pub const DEFAULT_DECOMPILER_BIN: &str = "revela";
pub const DEFAULT_DECOMPILE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_ENRICH_CONCURRENCY: usize = 4;
/// Transactions fetched per package when deriving recency metadata.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Sui JSON-RPC endpoint.
    pub rpc_url: String,
    /// Directory receiving `<module>.move` files. Wiped on every decompilation.
    pub output_dir: PathBuf,
    /// Project directory GraphQL endpoint. Project lookups are disabled when unset.
    pub metadata_url: Option<String>,
    /// Decompiler executable, looked up on `PATH` when not absolute.
    pub decompiler_bin: PathBuf,
    pub decompile_timeout: Duration,
    pub probe_timeout: Duration,
    pub http: HttpTimeouts,
    /// Upper bound on packages enriched in parallel.
    pub enrich_concurrency: usize,
    pub history_limit: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            rpc_url: MAINNET_RPC.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            metadata_url: None,
            decompiler_bin: PathBuf::from(DEFAULT_DECOMPILER_BIN),
            decompile_timeout: Duration::from_secs(DEFAULT_DECOMPILE_TIMEOUT_SECS),
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            http: HttpTimeouts::default(),
            enrich_concurrency: DEFAULT_ENRICH_CONCURRENCY,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl SourceConfig {
    /// Build the configuration from the process environment.
    ///
    /// | variable | default |
    /// |---|---|
    /// | `SUI_RPC_URL` | public fullnode of `SUI_NETWORK` |
    /// | `SUI_NETWORK` | `mainnet` (`testnet`, `devnet`) |
    /// | `WORKDIR` | `/workdir` |
    /// | `SUI_METADATA_GRAPHQL_URL` | unset |
    /// | `REVELA_BIN` | `revela` |
    /// | `SUI_SOURCE_DECOMPILE_TIMEOUT_SECS` | 30 |
    /// | `SUI_SOURCE_HTTP_TIMEOUT_SECS` | 30 |
    /// | `SUI_SOURCE_CONNECT_TIMEOUT_SECS` | 10 |
    /// | `SUI_SOURCE_ENRICH_CONCURRENCY` | 4 |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            rpc_url: env_string(ENV_RPC_URL).unwrap_or_else(|| {
                env_string(ENV_NETWORK)
                    .map(|network| default_rpc_endpoint(&network.to_lowercase()))
                    .unwrap_or(defaults.rpc_url)
            }),
            output_dir: env_string(ENV_OUTPUT_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            metadata_url: env_string(ENV_METADATA_URL),
            decompiler_bin: env_string(ENV_DECOMPILER_BIN)
                .map(PathBuf::from)
                .unwrap_or(defaults.decompiler_bin),
            decompile_timeout: Duration::from_secs(env_var_or(
                ENV_DECOMPILE_TIMEOUT_SECS,
                DEFAULT_DECOMPILE_TIMEOUT_SECS,
            )),
            probe_timeout: defaults.probe_timeout,
            http: HttpTimeouts::from_secs(
                env_var_or(ENV_HTTP_TIMEOUT_SECS, HttpTimeouts::DEFAULT_TIMEOUT_SECS),
                env_var_or(
                    ENV_CONNECT_TIMEOUT_SECS,
                    HttpTimeouts::DEFAULT_CONNECT_TIMEOUT_SECS,
                ),
            ),
            enrich_concurrency: env_var_or(ENV_ENRICH_CONCURRENCY, DEFAULT_ENRICH_CONCURRENCY)
                .max(1),
            history_limit: defaults.history_limit,
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_decompiler_bin(mut self, binary: impl Into<PathBuf>) -> Self {
        self.decompiler_bin = binary.into();
        self
    }

    pub fn with_metadata_url(mut self, url: impl Into<String>) -> Self {
        self.metadata_url = Some(url.into());
        self
    }
}
