//! Project aggregation.
//!
//! Resolves the project that lists a package, enriches each of the project's
//! packages with ledger data and returns them newest first.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use sui_source_types::{same_object_id, short_id};
use sui_transport::metadata::PACKAGE_LABEL;
use sui_transport::{ContractDescriptor, SocialLinks, TokenDescriptor, TransactionRecord};

use crate::sources::{LedgerSource, ProjectDirectory};

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("No project found for package {package_id}")]
    ProjectNotFound { package_id: String },
}

/// Why one package could not be enriched. Never leaves this module.
#[derive(Debug, Error)]
enum EnrichError {
    #[error("transaction timestamp {0} ms is out of range")]
    TimestampOutOfRange(u64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDetail {
    pub package_id: String,
    pub name: String,
    pub label: String,
    pub modules: Vec<String>,
    pub module_count: usize,
    /// Time of the most recent transaction touching the package.
    pub last_update_time: Option<DateTime<Utc>>,
    /// Version the package was created with, when the latest transaction created it.
    pub version: Option<u64>,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectReport {
    pub query_package_id: String,
    pub project_name: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub github: Option<String>,
    pub socials: SocialLinks,
    pub logo: Option<String>,
    pub categories: Vec<String>,
    /// Newest first; packages with no known update time last.
    pub packages: Vec<PackageDetail>,
    pub package_count: usize,
    pub total_modules: usize,
    pub tokens: Vec<TokenDescriptor>,
}

pub struct ProjectAggregator {
    directory: Arc<dyn ProjectDirectory>,
    ledger: Arc<dyn LedgerSource>,
    /// Bounded enrichment pool; `None` enriches on the calling thread.
    pool: Option<rayon::ThreadPool>,
    history_limit: usize,
}

impl ProjectAggregator {
    pub fn new(
        directory: Arc<dyn ProjectDirectory>,
        ledger: Arc<dyn LedgerSource>,
        concurrency: usize,
        history_limit: usize,
    ) -> Self {
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(concurrency.max(1))
            .thread_name(|i| format!("sui-source-enrich-{}", i))
            .build()
        {
            Ok(pool) => Some(pool),
            Err(e) => {
                warn!(error = %e, "failed to build enrichment pool, enriching sequentially");
                None
            }
        };
        Self {
            directory,
            ledger,
            pool,
            history_limit,
        }
    }

    /// Build the project report for the project listing `package_id`.
    pub fn run(&self, package_id: &str) -> Result<ProjectReport, AggregateError> {
        let project = self.directory.resolve_project(package_id).ok_or_else(|| {
            AggregateError::ProjectNotFound {
                package_id: package_id.to_string(),
            }
        })?;

        let contracts: Vec<&ContractDescriptor> = project
            .contracts
            .iter()
            .filter(|c| c.is_package())
            .collect();
        info!(
            package_id,
            project = %project.name,
            packages = contracts.len(),
            "enriching project packages"
        );

        let mut packages: Vec<PackageDetail> = match &self.pool {
            Some(pool) => pool.install(|| {
                contracts
                    .par_iter()
                    .map(|c| self.enrich_or_fallback(c))
                    .collect()
            }),
            None => contracts.iter().map(|c| self.enrich_or_fallback(c)).collect(),
        };
        sort_by_recency(&mut packages);

        let total_modules = packages.iter().map(|p| p.module_count).sum();
        Ok(ProjectReport {
            query_package_id: package_id.to_string(),
            project_name: project.name,
            short_description: project.short_description,
            description: project.description,
            website: project.website,
            github: project.github,
            socials: project.socials,
            logo: project.logo,
            categories: project.categories,
            package_count: packages.len(),
            total_modules,
            packages,
            tokens: project.tokens,
        })
    }

    fn enrich_or_fallback(&self, contract: &ContractDescriptor) -> PackageDetail {
        match self.enrich_package(contract) {
            Ok(detail) => detail,
            Err(e) => {
                warn!(package_id = %contract.id, error = %e, "enrichment failed, using fallback record");
                fallback_detail(&contract.id)
            }
        }
    }

    fn enrich_package(&self, contract: &ContractDescriptor) -> Result<PackageDetail, EnrichError> {
        let package_id = contract.id.as_str();
        let modules: Vec<String> = self.ledger.module_map(package_id).into_keys().collect();
        let transactions = self
            .ledger
            .transaction_history(package_id, self.history_limit);

        let latest = transactions.first();
        let last_update_time = match latest.and_then(|tx| tx.timestamp_ms) {
            Some(ms) => Some(timestamp_from_millis(ms)?),
            None => None,
        };
        let version = latest.and_then(|tx| created_version(tx, package_id));
        debug!(
            package_id,
            modules = modules.len(),
            transactions = transactions.len(),
            ?version,
            "enriched package"
        );

        Ok(PackageDetail {
            package_id: package_id.to_string(),
            name: contract
                .name
                .clone()
                .unwrap_or_else(|| synthesized_name(package_id)),
            label: contract
                .label
                .clone()
                .unwrap_or_else(|| PACKAGE_LABEL.to_string()),
            module_count: modules.len(),
            modules,
            last_update_time,
            version,
            transaction_count: transactions.len(),
        })
    }
}

/// `Package <first 8 characters of id>`.
pub fn synthesized_name(package_id: &str) -> String {
    format!("{} {}", PACKAGE_LABEL, short_id(package_id, 8))
}

fn fallback_detail(package_id: &str) -> PackageDetail {
    PackageDetail {
        package_id: package_id.to_string(),
        name: synthesized_name(package_id),
        label: PACKAGE_LABEL.to_string(),
        modules: Vec::new(),
        module_count: 0,
        last_update_time: None,
        version: None,
        transaction_count: 0,
    }
}

fn timestamp_from_millis(ms: u64) -> Result<DateTime<Utc>, EnrichError> {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .ok_or(EnrichError::TimestampOutOfRange(ms))
}

fn created_version(tx: &TransactionRecord, package_id: &str) -> Option<u64> {
    tx.created()
        .iter()
        .find(|obj| same_object_id(&obj.reference.object_id, package_id))
        .and_then(|obj| obj.reference.version)
}

/// Newest first, undated last. Stable, so ties keep their input order.
pub fn sort_by_recency(packages: &mut [PackageDetail]) {
    packages.sort_by_key(|p| Reverse(p.last_update_time));
}
