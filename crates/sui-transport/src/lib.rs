//! Sui Transport Layer
//!
//! Network transport for sui-source: one JSON-over-HTTP exchange shared by
//! every remote call, and the two clients built on it.
//!
//! This crate provides:
//! - [`http`]: [`JsonTransport`], a blocking JSON POST with timeouts and fixed headers
//! - [`rpc`]: [`LedgerClient`] for the Sui JSON-RPC object and transaction queries
//! - [`metadata`]: [`GraphMetadataClient`] for the project directory GraphQL service
//! - [`network`]: endpoint defaults
//!
//! # Example
//!
//! ```ignore
//! use sui_transport::{HttpTimeouts, LedgerClient};
//!
//! let ledger = LedgerClient::new("https://fullnode.mainnet.sui.io/", HttpTimeouts::default());
//! let modules = ledger.fetch_module_map("0x2");
//! let history = ledger.fetch_transaction_history("0x2", 50);
//! ```

pub mod error;
pub mod http;
pub mod metadata;
pub mod network;
pub mod rpc;

// Re-export main types for convenience
pub use error::{LedgerError, MetadataError, TransportError};
pub use http::{HttpTimeouts, JsonTransport};
pub use metadata::{
    ContractDescriptor, GraphMetadataClient, ProjectRecord, SocialLinks, TokenDescriptor,
};
pub use rpc::{
    LedgerClient, ModuleMap, ObjectRef, OwnedObjectRef, TransactionEffects, TransactionRecord,
};
