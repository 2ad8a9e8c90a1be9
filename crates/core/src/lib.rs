//! Core types and shared functionality for awning.
//!
//! This crate provides:
//! - Versioned cache namespaces with a SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use store::{Cache, CacheNames, CacheStore, ResponseRecord};
