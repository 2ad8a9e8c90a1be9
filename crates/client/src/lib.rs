//! Origin-facing HTTP client for awning.
//!
//! This crate provides the `Origin` trait that strategies fetch through,
//! the reqwest-backed implementation of it, and the request/response model
//! types shared by the worker.

pub mod origin;

pub use origin::{FetchMode, HttpOrigin, Origin, OriginConfig, OriginRequest, OriginResponse};

// Commonly needed third-party types, so downstream crates don't have to
// track reqwest themselves.
pub use bytes::Bytes;
pub use reqwest::{Method, StatusCode, header};
pub use url::Url;
