//! SQLite-backed store for versioned cache namespaces.
//!
//! This module provides the persistent response cache using SQLite with
//! async access via tokio-rusqlite. It supports:
//!
//! - Multiple named namespaces (one precache, one runtime per version)
//! - Request-addressed entries using SHA-256 keys
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Wholesale namespace deletion for version garbage collection

pub mod connection;
pub mod entries;
pub mod key;
pub mod migrations;
pub mod names;

pub use crate::Error;

pub use connection::CacheStore;
pub use entries::{Cache, ResponseRecord};
pub use key::request_key;
pub use names::CacheNames;
