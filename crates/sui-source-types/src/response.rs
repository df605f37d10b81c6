//! Unified tool response types.
//!
//! Every tool returns a [`ToolResponse`]: a success flag, a JSON result, and a
//! human-readable error string when the call failed. Nothing else crosses the
//! process boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unified response type for tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Whether the operation succeeded.
    pub success: bool,

    /// The result value (JSON for flexibility).
    pub result: Value,

    /// Error message if the operation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Additional error details (cause chain, context, etc.).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<Value>,

    /// Non-fatal warnings generated during execution.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// Execution duration in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl ToolResponse {
    /// Create a successful response with a result value.
    pub fn ok(result: Value) -> Self {
        Self {
            success: true,
            result,
            error: None,
            error_details: None,
            warnings: Vec::new(),
            duration_ms: None,
        }
    }

    /// Create an error response with a message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            result: Value::Null,
            error: Some(message.into()),
            error_details: None,
            warnings: Vec::new(),
            duration_ms: None,
        }
    }

    /// Create an error response from an error, keeping its source chain.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut response = Self::error(err.to_string());

        let mut chain = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        if !chain.is_empty() {
            response.error_details = Some(serde_json::json!({ "cause_chain": chain }));
        }

        response
    }

    /// Serialize `value` into a successful response.
    pub fn from_serializable<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => Self::ok(json),
            Err(e) => Self::error(format!("Failed to serialize result: {}", e)),
        }
    }

    /// Add a warning to the response.
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Set the execution duration.
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Convert the response to a JSON Value.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<anyhow::Error> for ToolResponse {
    fn from(err: anyhow::Error) -> Self {
        let mut response = Self::error(err.to_string());
        let chain: Vec<String> = err.chain().skip(1).map(|e| e.to_string()).collect();
        if !chain.is_empty() {
            response.error_details = Some(serde_json::json!({ "cause_chain": chain }));
        }
        response
    }
}

/// Extract and deserialize a tool input from a JSON Value.
///
/// ```ignore
/// let parsed: PackageIdInput = match extract_input(input) {
///     Ok(v) => v,
///     Err(e) => return e,
/// };
/// ```
pub fn extract_input<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ToolResponse> {
    serde_json::from_value(value).map_err(|e| ToolResponse::error(format!("Invalid input: {}", e)))
}

/// Metadata that can be attached to tool invocations under `_meta`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolMeta {
    /// Reason for the tool invocation (for logging/debugging).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Unique request ID for tracing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    /// Tags for categorization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}
