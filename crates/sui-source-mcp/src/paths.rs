use std::path::PathBuf;

use sui_source_types::env_string;

pub const ENV_HOME: &str = "SUI_SOURCE_HOME";

/// Local state of the server: tool-call logs live under here.
#[derive(Debug, Clone)]
pub struct SourcePaths {
    base: PathBuf,
}

impl SourcePaths {
    pub fn from_base(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base_dir(&self) -> PathBuf {
        self.base.clone()
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.base.join("logs").join("mcp")
    }
}

/// `$SUI_SOURCE_HOME`, or `~/.sui-source`.
pub fn default_paths() -> SourcePaths {
    let base = env_string(ENV_HOME)
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".sui-source")
        });
    SourcePaths::from_base(base)
}
