//! Append-only JSONL log of tool calls.

use anyhow::Result;
use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use sui_source_types::env_bool_or;

use crate::paths::default_paths;

pub const ENV_TOOL_LOG: &str = "SUI_SOURCE_TOOL_LOG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub enabled: bool,
    pub path: PathBuf,
    pub rotation_mb: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_paths().logs_dir(),
            rotation_mb: 50,
        }
    }
}

impl LogConfig {
    /// Defaults, switched off by `SUI_SOURCE_TOOL_LOG=0`.
    pub fn from_env() -> Self {
        Self {
            enabled: env_bool_or(ENV_TOOL_LOG, true),
            ..Self::default()
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct McpLogger {
    config: Mutex<LogConfig>,
    file: Mutex<Option<File>>,
    file_path: Mutex<Option<PathBuf>>,
}

impl McpLogger {
    pub fn new(config: LogConfig) -> Self {
        Self {
            config: Mutex::new(config),
            file: Mutex::new(None),
            file_path: Mutex::new(None),
        }
    }

    pub fn config(&self) -> LogConfig {
        self.config.lock().clone()
    }

    /// Path of the file currently being appended to, once one was opened.
    pub fn current_file(&self) -> Option<PathBuf> {
        self.file_path.lock().clone()
    }

    pub fn log_tool_call(&self, record: &LogRecord) -> Result<()> {
        let config = self.config.lock().clone();
        if !config.enabled {
            return Ok(());
        }

        fs::create_dir_all(&config.path)?;
        self.rotate_if_needed(&config);

        let mut file_guard = self.file.lock();
        if file_guard.is_none() {
            let file_path = current_log_path(&config);
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&file_path)?;
            *file_guard = Some(file);
            *self.file_path.lock() = Some(file_path);
        }

        if let Some(file) = file_guard.as_mut() {
            let line = serde_json::to_string(record)?;
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }

    fn rotate_if_needed(&self, config: &LogConfig) {
        let current = self.file_path.lock().clone();
        if let Some(path) = current {
            if let Ok(metadata) = fs::metadata(&path) {
                let size_mb = metadata.len() / (1024 * 1024);
                if size_mb >= config.rotation_mb {
                    *self.file.lock() = None;
                    *self.file_path.lock() = None;
                }
            }
        }
    }
}

fn current_log_path(config: &LogConfig) -> PathBuf {
    let ts = Utc::now().format("%Y%m%d-%H%M%S");
    config.path.join(format!("mcp-{}.jsonl", ts))
}

/// One line of the tool-call log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub ts: String,
    pub request_id: String,
    pub tool: String,
    pub input: Value,
    pub output: Value,
    pub duration_ms: u128,
    pub success: bool,
    pub error: Option<String>,
    /// Caller-supplied `_meta.reason`.
    pub reason: Option<String>,
    pub tags: Option<Vec<String>>,
}

pub fn redact_sensitive(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut redacted = serde_json::Map::new();
            for (k, v) in map {
                let key = k.to_lowercase();
                if key.contains("key")
                    || key.contains("token")
                    || key.contains("secret")
                    || key.contains("password")
                {
                    redacted.insert(k.clone(), Value::String("***redacted***".to_string()));
                } else {
                    redacted.insert(k.clone(), redact_sensitive(v));
                }
            }
            Value::Object(redacted)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(redact_sensitive).collect()),
        _ => value.clone(),
    }
}
