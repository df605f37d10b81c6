//! MCP tool handler implementations.
//!
//! The pipelines block on HTTP and subprocesses, so each handler moves its
//! work onto the blocking pool.

use serde_json::Value;

use sui_source_core::config::ENV_METADATA_URL;
use sui_source_core::HealthReport;
use sui_source_types::extract_input;

use super::inputs::PackageIdInput;
use crate::state::{ToolDispatcher, ToolResponse};

impl ToolDispatcher {
    pub async fn health_check(&self, _input: Value) -> ToolResponse {
        let probe = self.probe.clone();
        let rpc_url = self.config.rpc_url.clone();
        let metadata_configured = self.aggregator.is_some();
        match tokio::task::spawn_blocking(move || {
            HealthReport::check(&probe, &rpc_url, metadata_configured)
        })
        .await
        {
            Ok(report) => ToolResponse::from_serializable(&report),
            Err(e) => ToolResponse::error(format!("Health check failed: {}", e)),
        }
    }

    pub async fn get_source_code(&self, input: Value) -> ToolResponse {
        let package_id = match package_id_from(input) {
            Ok(v) => v,
            Err(e) => return e,
        };

        let pipeline = self.pipeline.clone();
        let outcome = match tokio::task::spawn_blocking(move || pipeline.run(&package_id)).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => return ToolResponse::from_error(&e),
            Err(e) => return ToolResponse::error(format!("Decompilation failed: {}", e)),
        };

        let failed = outcome.failed_count;
        let skipped = outcome.skipped_count;
        let mut result = match serde_json::to_value(&outcome) {
            Ok(Value::Object(map)) => map,
            Ok(_) => serde_json::Map::new(),
            Err(e) => return ToolResponse::error(format!("Failed to serialize result: {}", e)),
        };
        result.insert("success".to_string(), Value::Bool(true));

        let mut response = ToolResponse::ok(Value::Object(result));
        if failed > 0 {
            response = response.with_warning(format!("{} module(s) failed to decompile", failed));
        }
        if skipped > 0 {
            response = response.with_warning(format!(
                "{} module(s) skipped: bytecode could not be decoded",
                skipped
            ));
        }
        response
    }

    pub async fn get_project_info(&self, input: Value) -> ToolResponse {
        let package_id = match package_id_from(input) {
            Ok(v) => v,
            Err(e) => return e,
        };
        let Some(aggregator) = self.aggregator.clone() else {
            return ToolResponse::error(format!(
                "metadata endpoint not configured; set {} to enable project lookups",
                ENV_METADATA_URL
            ));
        };

        match tokio::task::spawn_blocking(move || aggregator.run(&package_id)).await {
            Ok(Ok(report)) => ToolResponse::from_serializable(&report),
            Ok(Err(e)) => ToolResponse::from_error(&e),
            Err(e) => ToolResponse::error(format!("Project lookup failed: {}", e)),
        }
    }
}

fn package_id_from(input: Value) -> Result<String, ToolResponse> {
    let parsed: PackageIdInput = extract_input(input)?;
    if parsed.package_id.trim().is_empty() {
        return Err(ToolResponse::error("Invalid input: package_id must not be empty"));
    }
    Ok(parsed.package_id)
}
