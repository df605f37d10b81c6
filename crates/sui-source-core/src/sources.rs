//! Data sources the pipelines depend on.
//!
//! Both traits are infallible by contract: implementations log their own
//! failures and return an empty/`None` result, so one bad package never
//! aborts a multi-package request.

use sui_transport::{GraphMetadataClient, LedgerClient, ModuleMap, ProjectRecord, TransactionRecord};

/// Ledger lookups used by both pipelines.
pub trait LedgerSource: Send + Sync {
    /// Module name to base64 bytecode; empty when the package cannot be read.
    fn module_map(&self, package_id: &str) -> ModuleMap;

    /// Most recent transactions touching `package_id`, newest first.
    fn transaction_history(&self, package_id: &str, limit: usize) -> Vec<TransactionRecord>;
}

/// Project directory lookup.
pub trait ProjectDirectory: Send + Sync {
    fn resolve_project(&self, package_id: &str) -> Option<ProjectRecord>;
}

impl LedgerSource for LedgerClient {
    fn module_map(&self, package_id: &str) -> ModuleMap {
        self.fetch_module_map(package_id)
    }

    fn transaction_history(&self, package_id: &str, limit: usize) -> Vec<TransactionRecord> {
        self.fetch_transaction_history(package_id, limit)
    }
}

impl ProjectDirectory for GraphMetadataClient {
    fn resolve_project(&self, package_id: &str) -> Option<ProjectRecord> {
        GraphMetadataClient::resolve_project(self, package_id)
    }
}
