#![allow(dead_code)]
//! Shared test utilities for the end-to-end tests.
//!
//! - `server`: a local JSON-over-HTTP responder standing in for the ledger
//!   RPC and the project directory
//! - `revela`: shell-script stand-ins for the decompiler binary

pub mod revela;
pub mod server;

pub use server::JsonServer;
