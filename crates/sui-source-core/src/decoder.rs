//! Bytecode decoding and scratch persistence.
//!
//! Module bytecode arrives base64-encoded; the decompiler wants a file.

use base64::Engine;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension of the scratch files handed to the decompiler.
pub const BYTECODE_EXTENSION: &str = "bytecode";

/// Extension of the decompiled source files.
pub const SOURCE_EXTENSION: &str = "move";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid base64 bytecode: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    /// Module names come from the network and become file names.
    #[error("module name {0:?} is not a plain identifier")]
    UnsafeName(String),
    #[error("failed to write bytecode file: {0}")]
    Io(#[from] std::io::Error),
}

/// Decode a base64 (standard alphabet, padded) bytecode blob.
pub fn decode(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    Ok(base64::engine::general_purpose::STANDARD.decode(encoded.trim())?)
}

/// Whether `name` is safe to use as a file stem: `[A-Za-z0-9_]+`.
pub fn is_safe_module_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Write `bytes` to `<dir>/<module>.bytecode`.
pub fn persist(dir: &Path, module: &str, bytes: &[u8]) -> Result<PathBuf, DecodeError> {
    if !is_safe_module_name(module) {
        return Err(DecodeError::UnsafeName(module.to_string()));
    }
    let path = dir.join(format!("{}.{}", module, BYTECODE_EXTENSION));
    std::fs::write(&path, bytes)?;
    Ok(path)
}

/// Decode `encoded` and write it to the scratch directory in one step.
pub fn decode_and_persist(dir: &Path, module: &str, encoded: &str) -> Result<PathBuf, DecodeError> {
    if !is_safe_module_name(module) {
        return Err(DecodeError::UnsafeName(module.to_string()));
    }
    let bytes = decode(encoded)?;
    persist(dir, module, &bytes)
}
