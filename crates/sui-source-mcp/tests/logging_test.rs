use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use sui_source_mcp::logging::{redact_sensitive, LogConfig, LogRecord, McpLogger};
use sui_source_mcp::paths::SourcePaths;

fn record(tool: &str) -> LogRecord {
    LogRecord {
        ts: "2025-01-01T00:00:00Z".to_string(),
        request_id: "req-1".to_string(),
        tool: tool.to_string(),
        input: serde_json::json!({"package_id": "0x2"}),
        output: serde_json::json!({"success": true}),
        duration_ms: 5,
        success: true,
        error: None,
        reason: Some("test".to_string()),
        tags: Some(vec!["unit".to_string()]),
    }
}

#[test]
fn redacts_sensitive_fields_recursively() {
    let input = serde_json::json!({
        "api_key": "secret",
        "package_id": "0x2",
        "nested": {
            "token": "t0k",
            "password": "pw",
            "safe": "ok"
        },
        "list": [{"secret": "shh", "ok": 1}]
    });

    let redacted = redact_sensitive(&input);
    assert_eq!(redacted["api_key"], "***redacted***");
    assert_eq!(redacted["package_id"], "0x2");
    assert_eq!(redacted["nested"]["token"], "***redacted***");
    assert_eq!(redacted["nested"]["password"], "***redacted***");
    assert_eq!(redacted["nested"]["safe"], "ok");
    assert_eq!(redacted["list"][0]["secret"], "***redacted***");
    assert_eq!(redacted["list"][0]["ok"], 1);
}

#[test]
fn logger_writes_jsonl_records() {
    let temp = TempDir::new().expect("tempdir");
    let log_dir = temp.path().join("logs");
    let logger = McpLogger::new(LogConfig {
        enabled: true,
        path: log_dir.clone(),
        rotation_mb: 50,
    });

    logger.log_tool_call(&record("get_source_code")).expect("log");
    logger.log_tool_call(&record("health_check")).expect("log");

    let entries: Vec<PathBuf> = fs::read_dir(&log_dir)
        .expect("read log dir")
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(logger.current_file(), Some(entries[0].clone()));

    let content = fs::read_to_string(&entries[0]).expect("read log");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("\"tool\":\"get_source_code\""));
    assert!(lines[1].contains("\"tool\":\"health_check\""));
}

#[test]
fn disabled_logger_writes_nothing() {
    let temp = TempDir::new().expect("tempdir");
    let log_dir = temp.path().join("logs");
    let logger = McpLogger::new(LogConfig {
        path: log_dir.clone(),
        ..LogConfig::disabled()
    });

    logger.log_tool_call(&record("health_check")).expect("log");

    assert!(!log_dir.exists());
    assert!(logger.current_file().is_none());
}

#[test]
fn derives_paths_from_base() {
    let base = PathBuf::from("/tmp/sui-source-paths");
    let paths = SourcePaths::from_base(base.clone());

    assert_eq!(paths.base_dir(), base);
    assert_eq!(
        paths.logs_dir(),
        PathBuf::from("/tmp/sui-source-paths/logs/mcp")
    );
}
