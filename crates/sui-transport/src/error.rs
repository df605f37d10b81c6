//! Error types for the transport layer.
//!
//! The clients expose these through their `try_*` methods. The infallible
//! `fetch_*` / `resolve_*` wrappers log them and collapse every variant into an
//! empty result, so a single failing package never aborts a larger request.

use thiserror::Error;

/// Failure of one HTTP exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// Connect, TLS, timeout or I/O failure before a response was read.
    #[error("request failed: {0}")]
    Network(String),
    /// The response body was not valid JSON.
    #[error("failed to decode response body: {0}")]
    Decode(String),
}

/// Failure of a ledger JSON-RPC call.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The JSON-RPC envelope carried an `error` member.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    /// The object exists (or not) but no `data.bcs.moduleMap` came back.
    #[error("no module map for object {0}")]
    MissingModuleMap(String),
    #[error("malformed RPC response: {0}")]
    Malformed(String),
}

/// Failure of a metadata directory query.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The GraphQL response carried a non-empty `errors` list.
    #[error("GraphQL error: {0}")]
    Query(String),
    #[error("no contract matches package {0}")]
    NoMatch(String),
    #[error("contract {0} is not linked to a project")]
    MissingProject(String),
    #[error("malformed GraphQL response: {0}")]
    Malformed(String),
}
