use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use sui_source_core::{
    Decompiler, DecompilationPipeline, LedgerSource, ProjectAggregator, ProjectDirectory,
    RevelaDecompiler, SourceConfig,
};
use sui_transport::{GraphMetadataClient, LedgerClient};

use crate::logging::{redact_sensitive, LogConfig, LogRecord, McpLogger};

pub use sui_source_types::{ToolMeta, ToolResponse};

pub const TOOL_HEALTH_CHECK: &str = "health_check";
pub const TOOL_GET_SOURCE_CODE: &str = "get_source_code";
pub const TOOL_GET_PROJECT_INFO: &str = "get_project_info";

/// Routes tool calls to the pipelines and records every call.
pub struct ToolDispatcher {
    pub(crate) config: SourceConfig,
    /// Probed by `health_check`; always the configured revela binary.
    pub(crate) probe: RevelaDecompiler,
    pub(crate) pipeline: Arc<DecompilationPipeline>,
    /// `None` when no metadata endpoint is configured.
    pub(crate) aggregator: Option<Arc<ProjectAggregator>>,
    pub logger: McpLogger,
}

impl ToolDispatcher {
    /// Wire the real clients from `config`.
    pub fn from_config(config: SourceConfig) -> Self {
        let ledger_client = LedgerClient::new(&config.rpc_url, config.http);
        info!(endpoint = ledger_client.endpoint(), "ledger client ready");
        let ledger: Arc<dyn LedgerSource> = Arc::new(ledger_client);
        let directory: Option<Arc<dyn ProjectDirectory>> = match &config.metadata_url {
            Some(url) => {
                let client = GraphMetadataClient::new(url, config.http);
                info!(endpoint = client.endpoint(), "metadata client ready");
                Some(Arc::new(client))
            }
            None => {
                warn!("SUI_METADATA_GRAPHQL_URL is not set, get_project_info is disabled");
                None
            }
        };
        let decompiler = Arc::new(RevelaDecompiler::new(
            config.decompiler_bin.clone(),
            config.decompile_timeout,
        ));
        Self::with_sources(
            config,
            ledger,
            directory,
            decompiler,
            McpLogger::new(LogConfig::from_env()),
        )
    }

    /// Wire explicit sources; the decompiler given here is the one the pipeline runs.
    pub fn with_sources(
        config: SourceConfig,
        ledger: Arc<dyn LedgerSource>,
        directory: Option<Arc<dyn ProjectDirectory>>,
        decompiler: Arc<dyn Decompiler>,
        logger: McpLogger,
    ) -> Self {
        let probe = RevelaDecompiler::new(config.decompiler_bin.clone(), config.decompile_timeout)
            .with_probe_timeout(config.probe_timeout);
        let pipeline = Arc::new(DecompilationPipeline::new(
            ledger.clone(),
            decompiler,
            config.output_dir.clone(),
        ));
        let aggregator = directory.map(|directory| {
            Arc::new(ProjectAggregator::new(
                directory,
                ledger,
                config.enrich_concurrency,
                config.history_limit,
            ))
        });
        info!(
            rpc_url = %config.rpc_url,
            output_dir = %config.output_dir.display(),
            metadata = aggregator.is_some(),
            "tool dispatcher ready"
        );
        Self {
            config,
            probe,
            pipeline,
            aggregator,
            logger,
        }
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    pub fn logger(&self) -> &McpLogger {
        &self.logger
    }

    pub async fn dispatch(&self, tool: &str, input: Value) -> ToolResponse {
        let (meta, clean_input) = extract_meta(&input);
        let request_id = meta
            .request_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let start = Instant::now();
        debug!(%request_id, tool, "tool call");

        let result = self.dispatch_inner(tool, clean_input.clone()).await;

        let duration_ms = start.elapsed().as_millis();
        let result = result.with_duration(u64::try_from(duration_ms).unwrap_or(u64::MAX));
        let record = LogRecord {
            ts: Utc::now().to_rfc3339(),
            request_id,
            tool: tool.to_string(),
            input: redact_sensitive(&clean_input),
            output: redact_sensitive(&result.to_json()),
            duration_ms,
            success: result.success,
            error: result.error.clone(),
            reason: meta.reason.clone(),
            tags: meta.tags.clone(),
        };
        if let Err(e) = self.logger.log_tool_call(&record) {
            warn!(error = %e, "failed to write tool-call log");
        }

        result
    }

    async fn dispatch_inner(&self, tool: &str, input: Value) -> ToolResponse {
        match tool {
            TOOL_HEALTH_CHECK => self.health_check(input).await,
            TOOL_GET_SOURCE_CODE => self.get_source_code(input).await,
            TOOL_GET_PROJECT_INFO => self.get_project_info(input).await,
            _ => ToolResponse::error(format!("Unknown tool: {}", tool)),
        }
    }
}

/// Split `_meta` off a tool input.
pub fn extract_meta(input: &Value) -> (ToolMeta, Value) {
    let mut meta = ToolMeta::default();
    if let Value::Object(map) = input {
        if let Some(Value::Object(meta_map)) = map.get("_meta") {
            if let Some(Value::String(reason)) = meta_map.get("reason") {
                meta.reason = Some(reason.clone());
            }
            if let Some(Value::String(req)) = meta_map.get("request_id") {
                meta.request_id = Some(req.clone());
            }
            if let Some(Value::Array(tags)) = meta_map.get("tags") {
                let parsed: Vec<String> = tags
                    .iter()
                    .filter_map(|v| v.as_str().map(|s| s.to_string()))
                    .collect();
                if !parsed.is_empty() {
                    meta.tags = Some(parsed);
                }
            }
        }

        let mut cleaned = map.clone();
        cleaned.remove("_meta");
        return (meta, Value::Object(cleaned));
    }
    (meta, input.clone())
}
