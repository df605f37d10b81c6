//! Project aggregation tests driven by in-memory fakes.

use std::collections::HashMap;
use std::sync::Arc;

use sui_source_core::{AggregateError, LedgerSource, ProjectAggregator, ProjectDirectory};
use sui_transport::{
    ContractDescriptor, ModuleMap, ObjectRef, OwnedObjectRef, ProjectRecord, TokenDescriptor,
    TransactionEffects, TransactionRecord,
};

#[derive(Default)]
struct FakeLedger {
    modules: HashMap<String, Vec<&'static str>>,
    history: HashMap<String, Vec<TransactionRecord>>,
}

impl FakeLedger {
    fn with_package(
        mut self,
        id: &str,
        modules: &[&'static str],
        history: Vec<TransactionRecord>,
    ) -> Self {
        self.modules.insert(id.to_string(), modules.to_vec());
        self.history.insert(id.to_string(), history);
        self
    }
}

impl LedgerSource for FakeLedger {
    fn module_map(&self, package_id: &str) -> ModuleMap {
        self.modules
            .get(package_id)
            .map(|names| {
                names
                    .iter()
                    .map(|n| (n.to_string(), "AA==".to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn transaction_history(&self, package_id: &str, limit: usize) -> Vec<TransactionRecord> {
        let mut history = self.history.get(package_id).cloned().unwrap_or_default();
        history.truncate(limit);
        history
    }
}

struct FakeDirectory {
    project: Option<ProjectRecord>,
}

impl ProjectDirectory for FakeDirectory {
    fn resolve_project(&self, _package_id: &str) -> Option<ProjectRecord> {
        self.project.clone()
    }
}

fn contract(id: &str, name: Option<&str>, label: &str) -> ContractDescriptor {
    ContractDescriptor {
        id: id.to_string(),
        name: name.map(str::to_string),
        label: Some(label.to_string()),
    }
}

fn tx(timestamp_ms: Option<u64>, created: &[(&str, u64)]) -> TransactionRecord {
    TransactionRecord {
        digest: "digest".to_string(),
        timestamp_ms,
        effects: Some(TransactionEffects {
            created: created
                .iter()
                .map(|(id, version)| OwnedObjectRef {
                    reference: ObjectRef {
                        object_id: id.to_string(),
                        version: Some(*version),
                        digest: None,
                    },
                })
                .collect(),
        }),
    }
}

fn project(contracts: Vec<ContractDescriptor>) -> ProjectRecord {
    ProjectRecord {
        name: "Deep Pool".to_string(),
        short_description: Some("An exchange".to_string()),
        website: Some("https://pool.example".to_string()),
        categories: vec!["DEX".to_string()],
        tokens: vec![TokenDescriptor {
            id: "0xtoken".to_string(),
            name: Some("DEEP".to_string()),
            label: Some("Token".to_string()),
        }],
        contracts,
        ..Default::default()
    }
}

fn aggregator(project: Option<ProjectRecord>, ledger: FakeLedger) -> ProjectAggregator {
    ProjectAggregator::new(
        Arc::new(FakeDirectory { project }),
        Arc::new(ledger),
        4,
        50,
    )
}

#[test]
fn test_only_package_contracts_are_enriched() {
    let ledger = FakeLedger::default()
        .with_package("0xaa", &["pool", "math"], vec![tx(Some(100), &[])])
        .with_package("0xbb", &["vault"], vec![tx(Some(50), &[])]);
    let record = project(vec![
        contract("0xaa", Some("Core"), "Package"),
        contract("0xcc", Some("Treasury"), "Object"),
        contract("0xbb", Some("Vault"), "Package"),
    ]);

    let report = aggregator(Some(record), ledger).run("0xaa").unwrap();

    assert_eq!(report.query_package_id, "0xaa");
    assert_eq!(report.project_name, "Deep Pool");
    assert_eq!(report.package_count, 2);
    assert_eq!(report.total_modules, 3);
    assert_eq!(report.packages[0].package_id, "0xaa");
    assert_eq!(report.packages[0].modules, vec!["math", "pool"]);
    assert_eq!(report.packages[0].module_count, 2);
    assert_eq!(report.packages[1].module_count, 1);
    assert_eq!(report.tokens.len(), 1);
    assert_eq!(report.categories, vec!["DEX"]);
}

#[test]
fn test_packages_sorted_newest_first_with_undated_last() {
    let ledger = FakeLedger::default()
        .with_package("0x1", &["a"], vec![])
        .with_package("0x2", &["b"], vec![tx(Some(50), &[])])
        .with_package("0x3", &["c"], vec![tx(Some(100), &[]), tx(Some(10), &[])]);
    let record = project(vec![
        contract("0x1", None, "Package"),
        contract("0x2", None, "Package"),
        contract("0x3", None, "Package"),
    ]);

    let report = aggregator(Some(record), ledger).run("0x1").unwrap();

    let order: Vec<_> = report.packages.iter().map(|p| p.package_id.as_str()).collect();
    assert_eq!(order, vec!["0x3", "0x2", "0x1"]);
    let millis: Vec<_> = report
        .packages
        .iter()
        .map(|p| p.last_update_time.map(|t| t.timestamp_millis()))
        .collect();
    assert_eq!(millis, vec![Some(100), Some(50), None]);
    assert_eq!(report.packages[0].transaction_count, 2);
    assert_eq!(report.packages[2].transaction_count, 0);
}

#[test]
fn test_version_comes_from_created_package() {
    let package = "0x00000000000000000000000000000000000000000000000000000000000000ab";
    let ledger = FakeLedger::default().with_package(
        "0xab",
        &["m"],
        vec![tx(Some(1_700_000_000_000), &[("0xother", 7), (package, 1)])],
    );
    let record = project(vec![contract("0xab", Some("Core"), "Package")]);

    let report = aggregator(Some(record), ledger).run("0xab").unwrap();

    let detail = &report.packages[0];
    assert_eq!(detail.version, Some(1));
    assert_eq!(
        detail.last_update_time.map(|t| t.to_rfc3339()),
        Some("2023-11-14T22:13:20+00:00".to_string())
    );
}

#[test]
fn test_out_of_range_timestamp_falls_back() {
    let ledger = FakeLedger::default()
        .with_package("0x1234567890", &["a", "b"], vec![tx(Some(u64::MAX), &[])])
        .with_package("0xfeed", &["c"], vec![tx(Some(5), &[])]);
    let record = project(vec![
        contract("0x1234567890", Some("Broken"), "Package"),
        contract("0xfeed", Some("Fine"), "Package"),
    ]);

    let report = aggregator(Some(record), ledger).run("0xfeed").unwrap();

    assert_eq!(report.package_count, 2);
    let fallback = &report.packages[1];
    assert_eq!(fallback.package_id, "0x1234567890");
    assert_eq!(fallback.name, "Package 0x123456");
    assert_eq!(fallback.label, "Package");
    assert_eq!(fallback.module_count, 0);
    assert!(fallback.last_update_time.is_none());
    assert!(fallback.version.is_none());
    assert_eq!(fallback.transaction_count, 0);
    assert_eq!(report.total_modules, 1);
}

#[test]
fn test_unnamed_contract_gets_synthesized_name() {
    let ledger = FakeLedger::default().with_package("0xabcdef0123", &["m"], vec![]);
    let record = project(vec![contract("0xabcdef0123", None, "Package")]);

    let report = aggregator(Some(record), ledger).run("0xabcdef0123").unwrap();

    assert_eq!(report.packages[0].name, "Package 0xabcdef");
}

#[test]
fn test_project_not_found() {
    let err = aggregator(None, FakeLedger::default())
        .run("0xmissing")
        .unwrap_err();

    match err {
        AggregateError::ProjectNotFound { package_id } => assert_eq!(package_id, "0xmissing"),
    }
}

#[test]
fn test_project_without_packages() {
    let record = project(vec![contract("0xcoin", Some("Coin"), "Object")]);

    let report = aggregator(Some(record), FakeLedger::default())
        .run("0xcoin")
        .unwrap();

    assert_eq!(report.package_count, 0);
    assert_eq!(report.total_modules, 0);
    assert!(report.packages.is_empty());
}

#[test]
fn test_report_serializes_rfc3339_timestamps() {
    let ledger = FakeLedger::default().with_package("0x1", &["a"], vec![tx(Some(0), &[])]);
    let record = project(vec![contract("0x1", None, "Package")]);

    let report = aggregator(Some(record), ledger).run("0x1").unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(
        json["packages"][0]["last_update_time"],
        "1970-01-01T00:00:00Z"
    );
    assert_eq!(json["package_count"], 1);
}
