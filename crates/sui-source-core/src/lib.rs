//! Core pipelines for sui-source.
//!
//! Two orchestration pipelines sit on top of the transport clients:
//!
//! - [`pipeline::DecompilationPipeline`] downloads a package's module map,
//!   decodes each module, runs the external decompiler on it and writes the
//!   sources into a flat output directory. Per-module failures never abort the
//!   package.
//! - [`project::ProjectAggregator`] resolves the project that lists a package,
//!   enriches every package of that project with its module list and recency
//!   metadata, and returns one time-ordered report. Per-package failures
//!   degrade into fallback records.
//!
//! The pipelines only see the narrow traits in [`sources`] and
//! [`decompiler::Decompiler`], so tests drive them with in-memory fakes.
//!
//! ```text
//! get_source_code ──► LedgerSource ──► decoder ──► Decompiler ──► <output>/<module>.move
//! get_project_info ─► ProjectDirectory ──► LedgerSource (modules + history) ──► sort ──► report
//! ```

pub mod config;
pub mod decoder;
pub mod decompiler;
pub mod health;
pub mod pipeline;
pub mod project;
pub mod sources;

pub use config::SourceConfig;
pub use decoder::DecodeError;
pub use decompiler::{DecompileError, Decompiler, RevelaDecompiler};
pub use health::HealthReport;
pub use pipeline::{DecompilationOutcome, DecompilationPipeline, PipelineError};
pub use project::{AggregateError, PackageDetail, ProjectAggregator, ProjectReport};
pub use sources::{LedgerSource, ProjectDirectory};
