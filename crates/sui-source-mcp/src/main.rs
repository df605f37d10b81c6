use rmcp::{
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServiceExt,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sui_source_core::SourceConfig;
use sui_source_mcp::state::{TOOL_GET_PROJECT_INFO, TOOL_GET_SOURCE_CODE, TOOL_HEALTH_CHECK};
use sui_source_mcp::ToolDispatcher;

#[derive(Clone)]
struct SourceMcpServer {
    dispatcher: Arc<ToolDispatcher>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl SourceMcpServer {
    fn new(dispatcher: ToolDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            tool_router: Self::tool_router(),
        }
    }

    async fn dispatch_tool(
        &self,
        name: &str,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        let response = self.dispatcher.dispatch(name, params.0).await;
        let structured = response.to_json();
        let content_text = if response.success {
            serde_json::to_string_pretty(&response.result).unwrap_or_else(|_| "ok".to_string())
        } else {
            response
                .error
                .clone()
                .unwrap_or_else(|| "error".to_string())
        };
        Ok(CallToolResult {
            content: vec![Content::text(content_text)],
            structured_content: Some(structured),
            is_error: Some(!response.success),
            meta: None,
        })
    }

    #[tool(
        name = "health_check",
        description = "Check if the server and the revela decompiler are working correctly"
    )]
    async fn health_check(&self, params: Parameters<Value>) -> Result<CallToolResult, McpError> {
        self.dispatch_tool(TOOL_HEALTH_CHECK, params).await
    }

    #[tool(
        name = "get_source_code",
        description = "Download the bytecode of a Sui package and decompile it with revela. \
                       Sources are written flat into the server's work directory as \
                       <module>.move; the directory is cleared on every call. \
                       Input: {\"package_id\": \"0x...\"}"
    )]
    async fn get_source_code(&self, params: Parameters<Value>) -> Result<CallToolResult, McpError> {
        self.dispatch_tool(TOOL_GET_SOURCE_CODE, params).await
    }

    #[tool(
        name = "get_project_info",
        description = "Resolve the project that lists a Sui package and report all of its \
                       packages with module lists and last update time, newest first. \
                       Requires the SUI_METADATA_GRAPHQL_URL environment variable to be set \
                       on the server; without it this tool returns a not-configured error. \
                       Input: {\"package_id\": \"0x...\"}"
    )]
    async fn get_project_info(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool(TOOL_GET_PROJECT_INFO, params).await
    }
}

#[tool_handler]
impl rmcp::ServerHandler for SourceMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "sui-source MCP server. Use get_source_code to decompile a package and \
                 get_project_info to see every package of the project behind it \
                 (needs SUI_METADATA_GRAPHQL_URL)."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the MCP protocol.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = SourceConfig::from_env();
    info!(
        rpc_url = %config.rpc_url,
        decompiler = %config.decompiler_bin.display(),
        "starting sui-source-mcp"
    );

    let server = SourceMcpServer::new(ToolDispatcher::from_config(config));
    let service = server.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;
    Ok(())
}
