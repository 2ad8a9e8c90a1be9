//! The interception dispatcher.
//!
//! [`Worker::handle`] is the per-request entry point: classify, then
//! either delegate to the strategy bound to the category or decline so
//! the host forwards the request untouched. Lifecycle entry points live
//! in their own module, strategies in theirs.

use std::sync::Arc;

use awning_client::{Method, Origin, OriginRequest, Url, header};
use awning_core::{AppConfig, CacheNames, CacheStore, Error};

use crate::classify::{Category, ClassifierRules};
use crate::response::ServedResponse;
use crate::synthetic;

/// Outcome of offering a request to the worker.
#[derive(Debug)]
pub enum Intercept {
    /// The worker handled the request; serve this response.
    Respond(ServedResponse),

    /// Not ours; forward the request to the network unmodified.
    PassThrough,
}

impl Intercept {
    /// The served response, if the request was intercepted.
    pub fn response(self) -> Option<ServedResponse> {
        match self {
            Intercept::Respond(response) => Some(response),
            Intercept::PassThrough => None,
        }
    }
}

/// The request-interception worker.
///
/// One instance per process. Construction compiles the classifier and
/// derives the namespace names for the configured version; namespaces
/// themselves are opened lazily on first use.
pub struct Worker {
    pub(crate) store: CacheStore,
    pub(crate) origin: Arc<dyn Origin>,
    pub(crate) names: CacheNames,
    pub(crate) base: Url,
    pub(crate) sentinel_url: Url,
    pub(crate) sentinel_key: String,
    pub(crate) shell_paths: Vec<String>,
    pub(crate) offline_html: String,
    version: String,
    rules: ClassifierRules,
}

impl Worker {
    /// Build a worker over a store and an origin.
    ///
    /// # Errors
    ///
    /// Fails if the configured origin base is not a valid URL, or the
    /// exclusion list cannot be compiled into a matcher.
    pub fn new(store: CacheStore, origin: Arc<dyn Origin>, config: &AppConfig) -> Result<Self, Error> {
        let base = Url::parse(&config.origin)
            .map_err(|e| Error::InvalidUrl(format!("origin {}: {}", config.origin, e)))?;
        let sentinel_url = base
            .join(synthetic::OFFLINE_SENTINEL_PATH)
            .map_err(|e| Error::InvalidUrl(format!("offline sentinel: {}", e)))?;
        let sentinel_key = OriginRequest::get(sentinel_url.clone()).cache_key();
        let rules = ClassifierRules::from_config(config)
            .map_err(|e| Error::InvalidConfig(format!("exclude_fragments: {}", e)))?;

        Ok(Self {
            store,
            origin,
            names: CacheNames::for_version(&config.version),
            base,
            sentinel_url,
            sentinel_key,
            shell_paths: config.shell_paths.clone(),
            offline_html: config.offline_html.clone(),
            version: config.version.clone(),
            rules,
        })
    }

    /// The configured deployment version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The namespace names for this version.
    pub fn names(&self) -> &CacheNames {
        &self.names
    }

    /// Offer a request to the worker.
    ///
    /// Non-GET requests and anything classified Excluded or Unhandled
    /// pass through without touching the store or the origin. Handled
    /// categories always produce a response: internal failures resolve
    /// to fallbacks, never to an error.
    pub async fn handle(&self, req: OriginRequest) -> Intercept {
        if req.method != Method::GET {
            return Intercept::PassThrough;
        }

        let accept = req.headers.get(header::ACCEPT).and_then(|v| v.to_str().ok());
        let category = self.rules.classify(&req.url, accept);

        tracing::debug!("{} {} classified as {:?}", req.method, req.url.path(), category);

        match category {
            Category::Excluded | Category::Unhandled => Intercept::PassThrough,
            Category::Document => Intercept::Respond(self.network_first(req).await),
            Category::Asset => Intercept::Respond(self.stale_while_revalidate(req).await),
            Category::Media => Intercept::Respond(self.cache_first(req).await),
        }
    }
}
