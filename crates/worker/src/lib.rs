//! Request interception and cache lifecycle for offline-capable web apps.
//!
//! This crate provides:
//! - Path-based request classification with a configurable exclusion list
//! - Three caching strategies: network-first for documents,
//!   stale-while-revalidate for assets, cache-first for media
//! - Versioned cache lifecycle: precache population on install, garbage
//!   collection of stale versions on activate
//! - Synthetic fallbacks when neither network nor cache can answer

pub mod classify;
pub mod response;
pub mod synthetic;
pub mod worker;

mod lifecycle;
mod strategy;

#[cfg(test)]
pub(crate) mod testing;

pub use classify::{Category, ClassifierRules};
pub use response::{ServedFrom, ServedResponse};
pub use worker::{Intercept, Worker};
