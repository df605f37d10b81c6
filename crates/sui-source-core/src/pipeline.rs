//! Package decompilation pipeline.
//!
//! One run per `get_source_code` call:
//!
//! 1. lock and wipe the output directory,
//! 2. fetch the module map (empty map ends the run),
//! 3. decode every module into a scratch directory,
//! 4. decompile every decoded module and write `<module>.move`,
//! 5. report which modules succeeded, failed, or were skipped.
//!
//! A module that cannot be decoded never reaches the decompiler and is
//! reported as *skipped*; a module the decompiler (or the final write) rejects
//! is reported as *failed*. Files already written stay written if a later
//! module fails.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::decoder::{self, SOURCE_EXTENSION};
use crate::decompiler::Decompiler;
use crate::sources::LedgerSource;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to download bytecode - package not found or no modules")]
    NoModules { package_id: String },
    #[error("output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create scratch directory: {0}")]
    Scratch(#[source] io::Error),
}

/// Per-package result of a decompilation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecompilationOutcome {
    pub package_id: String,
    pub output_dir: String,
    pub output_dir_info: String,
    pub total_modules: usize,
    pub decompiled_modules: Vec<String>,
    pub failed_modules: Vec<String>,
    /// Modules whose bytecode could not be decoded; never handed to the decompiler.
    pub skipped_modules: Vec<String>,
    pub decompiled_count: usize,
    pub failed_count: usize,
    pub skipped_count: usize,
    /// Reason for every failed or skipped module.
    pub errors: BTreeMap<String, String>,
}

/// Counts of a directory reset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResetSummary {
    pub removed: usize,
    pub failed: usize,
}

pub struct DecompilationPipeline {
    ledger: Arc<dyn LedgerSource>,
    decompiler: Arc<dyn Decompiler>,
    output_dir: PathBuf,
    /// Held for a whole run; concurrent runs would wipe each other's output.
    output_lock: Mutex<()>,
}

impl DecompilationPipeline {
    pub fn new(
        ledger: Arc<dyn LedgerSource>,
        decompiler: Arc<dyn Decompiler>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            ledger,
            decompiler,
            output_dir: output_dir.into(),
            output_lock: Mutex::new(()),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Decompile every module of `package_id` into the output directory.
    pub fn run(&self, package_id: &str) -> Result<DecompilationOutcome, PipelineError> {
        let _guard = self.output_lock.lock();

        let reset = reset_output_dir(&self.output_dir).map_err(|source| {
            PipelineError::OutputDir {
                path: self.output_dir.clone(),
                source,
            }
        })?;
        info!(
            package_id,
            removed = reset.removed,
            failed = reset.failed,
            "starting decompilation"
        );

        let modules = self.ledger.module_map(package_id);
        if modules.is_empty() {
            return Err(PipelineError::NoModules {
                package_id: package_id.to_string(),
            });
        }
        info!(package_id, modules = modules.len(), "downloaded module map");

        let scratch = tempfile::Builder::new()
            .prefix("sui-source-")
            .tempdir()
            .map_err(PipelineError::Scratch)?;

        let mut skipped = Vec::new();
        let mut errors = BTreeMap::new();
        let mut bytecode_files = Vec::with_capacity(modules.len());
        for (name, encoded) in &modules {
            match decoder::decode_and_persist(scratch.path(), name, encoded) {
                Ok(path) => bytecode_files.push((name.as_str(), path)),
                Err(e) => {
                    error!(module = %name, error = %e, "failed to decode bytecode");
                    errors.insert(name.clone(), e.to_string());
                    skipped.push(name.clone());
                }
            }
        }

        let mut decompiled = Vec::new();
        let mut failed = Vec::new();
        for (name, bytecode_path) in bytecode_files {
            info!(module = name, "decompiling module");
            let result = self
                .decompiler
                .decompile(&bytecode_path)
                .map_err(|e| e.to_string())
                .and_then(|source| {
                    self.write_source(name, &source)
                        .map_err(|e| format!("failed to write source: {}", e))
                });
            match result {
                Ok(path) => {
                    info!(module = name, path = %path.display(), "decompiled");
                    decompiled.push(name.to_string());
                }
                Err(reason) => {
                    error!(module = name, %reason, "failed to decompile module");
                    errors.insert(name.to_string(), reason);
                    failed.push(name.to_string());
                }
            }
        }

        info!(
            package_id,
            decompiled = decompiled.len(),
            total = modules.len(),
            "decompilation completed"
        );

        Ok(DecompilationOutcome {
            package_id: package_id.to_string(),
            output_dir: self.output_dir.display().to_string(),
            output_dir_info: format!(
                "Sources are written to {} with the .{} extension, one file per module and no \
                 subdirectories. The directory is cleared on every call; move sources elsewhere \
                 if they need to be kept.",
                self.output_dir.display(),
                SOURCE_EXTENSION
            ),
            total_modules: modules.len(),
            decompiled_count: decompiled.len(),
            failed_count: failed.len(),
            skipped_count: skipped.len(),
            decompiled_modules: decompiled,
            failed_modules: failed,
            skipped_modules: skipped,
            errors,
        })
    }

    fn write_source(&self, module: &str, source: &str) -> io::Result<PathBuf> {
        let path = self
            .output_dir
            .join(format!("{}.{}", module, SOURCE_EXTENSION));
        fs::write(&path, source)?;
        Ok(path)
    }
}

/// Create `dir` if needed and delete every entry directly under it.
///
/// Symlinks are removed, never followed. A failure on one entry is logged
/// and counted; only failing to create or list `dir` itself is an error.
pub fn reset_output_dir(dir: &Path) -> io::Result<ResetSummary> {
    fs::create_dir_all(dir)?;

    let mut summary = ResetSummary::default();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                summary.failed += 1;
                continue;
            }
        };
        let path = entry.path();
        let removed = match entry.file_type() {
            Ok(kind) if kind.is_dir() => fs::remove_dir_all(&path),
            Ok(_) => fs::remove_file(&path),
            Err(e) => Err(e),
        };
        match removed {
            Ok(()) => summary.removed += 1,
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to delete");
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_creates_missing_dir() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("out");

        let summary = reset_output_dir(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(summary, ResetSummary::default());
    }

    #[test]
    fn test_reset_removes_files_and_subdirectories() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path();
        fs::write(dir.join("old.move"), "module old {}").unwrap();
        fs::create_dir_all(dir.join("sub").join("deeper")).unwrap();
        fs::write(dir.join("sub").join("deeper").join("x"), "x").unwrap();

        let summary = reset_output_dir(dir).unwrap();
        assert_eq!(summary.removed, 2);
        assert_eq!(summary.failed, 0);
        assert_eq!(fs::read_dir(dir).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_reset_removes_symlink_not_target() {
        let root = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let target_dir = outside.path().join("keep");
        fs::create_dir(&target_dir).unwrap();
        fs::write(target_dir.join("important"), "data").unwrap();

        let out = root.path().join("out");
        fs::create_dir(&out).unwrap();
        std::os::unix::fs::symlink(&target_dir, out.join("link")).unwrap();

        reset_output_dir(&out).unwrap();
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
        assert!(target_dir.join("important").exists());
    }
}
