//! sui-source
//!
//! Resolve a Sui package id into:
//!
//! - **Decompiled sources**: every module's bytecode is fetched over JSON-RPC,
//!   decoded and handed to the external `revela` decompiler; the results land
//!   as `<module>.move` files in one flat output directory.
//! - **Project reports**: the project that lists the package is looked up in
//!   a GraphQL directory and each of its packages is enriched with module
//!   lists and recency metadata from the ledger.
//!
//! This crate re-exports the workspace members. The MCP server lives in the
//! `sui-source-mcp` binary crate.
//!
//! ```no_run
//! use std::sync::Arc;
//! use sui_source::sui_source_core::{DecompilationPipeline, RevelaDecompiler, SourceConfig};
//! use sui_source::sui_transport::LedgerClient;
//!
//! let config = SourceConfig::from_env();
//! let pipeline = DecompilationPipeline::new(
//!     Arc::new(LedgerClient::new(&config.rpc_url, config.http)),
//!     Arc::new(RevelaDecompiler::new(config.decompiler_bin.clone(), config.decompile_timeout)),
//!     config.output_dir.clone(),
//! );
//! let outcome = pipeline.run("0x2").unwrap();
//! println!("{} of {} modules decompiled", outcome.decompiled_count, outcome.total_modules);
//! ```

pub use sui_source_core;
pub use sui_source_types;
pub use sui_transport;

pub use sui_source_core::{
    DecompilationOutcome, DecompilationPipeline, HealthReport, PackageDetail, ProjectAggregator,
    ProjectReport, SourceConfig,
};
pub use sui_source_types::ToolResponse;
