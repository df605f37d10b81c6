//! Sui JSON-RPC client for package bytecode and transaction history.
//!
//! Two calls are used:
//!
//! - `sui_getObject` with every display option enabled; the package's modules
//!   come back base64-encoded under `result.data.bcs.moduleMap`.
//! - `suix_queryTransactionBlocks` filtered by `ChangedObject`, newest first,
//!   one page only.
//!
//! Every failure collapses to an empty result in the `fetch_*` methods. The
//! `try_*` variants keep the distinction for callers that need it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

use crate::error::LedgerError;
use crate::http::{HttpTimeouts, JsonTransport};

/// Module name to base64-encoded bytecode.
pub type ModuleMap = BTreeMap<String, String>;

/// Default page size for transaction history queries.
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// Sui JSON-RPC client.
#[derive(Clone)]
pub struct LedgerClient {
    endpoint: String,
    transport: JsonTransport,
}

impl LedgerClient {
    pub fn new(endpoint: &str, timeouts: HttpTimeouts) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            transport: JsonTransport::new(timeouts),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the module map of `package_id`.
    ///
    /// Returns an empty map on any failure; the cause is logged.
    pub fn fetch_module_map(&self, package_id: &str) -> ModuleMap {
        match self.try_fetch_module_map(package_id) {
            Ok(modules) => {
                info!(package_id, modules = modules.len(), "retrieved module map");
                modules
            }
            Err(LedgerError::MissingModuleMap(_)) => {
                warn!(package_id, "no moduleMap found in response");
                ModuleMap::new()
            }
            Err(e) => {
                error!(package_id, error = %e, "failed to download package bytecode");
                ModuleMap::new()
            }
        }
    }

    /// Fetch the module map of `package_id`, keeping the failure cause.
    pub fn try_fetch_module_map(&self, package_id: &str) -> Result<ModuleMap, LedgerError> {
        let body = rpc_request(
            "sui_getObject",
            json!([
                package_id,
                {
                    "showType": true,
                    "showOwner": true,
                    "showPreviousTransaction": true,
                    "showDisplay": true,
                    "showContent": true,
                    "showBcs": true,
                    "showStorageRebate": true
                }
            ]),
        );
        let response = self.transport.post_json(&self.endpoint, &body)?;
        parse_module_map(package_id, response)
    }

    /// Fetch up to `limit` of the most recent transactions that changed
    /// `package_id`, newest first.
    ///
    /// Returns an empty list on any failure; the cause is logged.
    pub fn fetch_transaction_history(
        &self,
        package_id: &str,
        limit: usize,
    ) -> Vec<TransactionRecord> {
        match self.try_fetch_transaction_history(package_id, limit) {
            Ok(records) => {
                debug!(package_id, transactions = records.len(), "retrieved history");
                records
            }
            Err(e) => {
                error!(package_id, error = %e, "failed to query transaction history");
                Vec::new()
            }
        }
    }

    /// Fetch transaction history, keeping the failure cause.
    pub fn try_fetch_transaction_history(
        &self,
        package_id: &str,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, LedgerError> {
        let body = rpc_request(
            "suix_queryTransactionBlocks",
            json!([
                {
                    "filter": { "ChangedObject": package_id },
                    "options": {
                        "showEffects": true,
                        "showBalanceChanges": true,
                        "showInput": true
                    }
                },
                Value::Null,
                limit,
                true
            ]),
        );
        let response = self.transport.post_json(&self.endpoint, &body)?;
        parse_transaction_page(response)
    }
}

fn rpc_request(method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
        "params": params
    })
}

// =============================================================================
// Response shapes
// =============================================================================

#[derive(Debug, Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ObjectResponse {
    #[serde(default)]
    data: Option<ObjectData>,
    /// Object-level error, e.g. `{"code": "notExists", "object_id": ...}`.
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ObjectData {
    #[serde(default)]
    bcs: Option<ObjectBcs>,
}

#[derive(Debug, Deserialize)]
struct ObjectBcs {
    #[serde(rename = "moduleMap", default)]
    module_map: Option<ModuleMap>,
}

#[derive(Debug, Deserialize)]
struct TransactionPage {
    #[serde(default)]
    data: Vec<Value>,
}

/// One transaction from `suix_queryTransactionBlocks`, reduced to the fields
/// used for recency metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub digest: String,
    #[serde(
        rename = "timestampMs",
        default,
        deserialize_with = "deserialize_opt_u64"
    )]
    pub timestamp_ms: Option<u64>,
    #[serde(default)]
    pub effects: Option<TransactionEffects>,
}

impl TransactionRecord {
    /// Objects created by this transaction; empty when effects were not returned.
    pub fn created(&self) -> &[OwnedObjectRef] {
        self.effects
            .as_ref()
            .map(|e| e.created.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionEffects {
    /// Entries without a usable object reference are dropped.
    #[serde(default, deserialize_with = "deserialize_lenient_vec")]
    pub created: Vec<OwnedObjectRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedObjectRef {
    pub reference: ObjectRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectRef {
    #[serde(rename = "objectId")]
    pub object_id: String,
    #[serde(default, deserialize_with = "deserialize_opt_u64")]
    pub version: Option<u64>,
    #[serde(default)]
    pub digest: Option<String>,
}

/// Sui encodes u64 values as JSON strings; accept numbers too.
fn deserialize_opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        Number(u64),
        String(String),
    }

    match Option::<StringOrNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOrNumber::Number(n)) => Ok(Some(n)),
        Some(StringOrNumber::String(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn deserialize_lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect())
}

/// Extract the module map from a `sui_getObject` response body.
pub fn parse_module_map(package_id: &str, body: Value) -> Result<ModuleMap, LedgerError> {
    let envelope: RpcEnvelope<ObjectResponse> =
        serde_json::from_value(body).map_err(|e| LedgerError::Malformed(e.to_string()))?;

    if let Some(err) = envelope.error {
        return Err(LedgerError::Rpc {
            code: err.code,
            message: err.message,
        });
    }

    let object = envelope
        .result
        .ok_or_else(|| LedgerError::Malformed("missing result".to_string()))?;
    if let Some(object_error) = &object.error {
        debug!(package_id, error = %object_error, "object lookup returned an error");
    }

    object
        .data
        .and_then(|data| data.bcs)
        .and_then(|bcs| bcs.module_map)
        .filter(|modules| !modules.is_empty())
        .ok_or_else(|| LedgerError::MissingModuleMap(package_id.to_string()))
}

/// Extract the transaction list from a `suix_queryTransactionBlocks` response body.
pub fn parse_transaction_page(body: Value) -> Result<Vec<TransactionRecord>, LedgerError> {
    let envelope: RpcEnvelope<TransactionPage> =
        serde_json::from_value(body).map_err(|e| LedgerError::Malformed(e.to_string()))?;

    if let Some(err) = envelope.error {
        return Err(LedgerError::Rpc {
            code: err.code,
            message: err.message,
        });
    }

    let page = envelope
        .result
        .ok_or_else(|| LedgerError::Malformed("missing result".to_string()))?;

    // One odd record must not cost the rest of the page.
    Ok(page
        .data
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| match serde_json::from_value::<TransactionRecord>(raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index, error = %e, "skipping malformed transaction record");
                None
            }
        })
        .collect())
}
