//! The three caching strategies.
//!
//! Storage failures never surface to the requester: reads degrade to
//! misses and writes are dropped with a debug log. The network outcome
//! decides what happens next, not the store.

use std::sync::Arc;

use awning_client::{FetchMode, Origin, OriginRequest};
use awning_core::ResponseRecord;

use crate::response::{ServedFrom, ServedResponse};
use crate::synthetic;
use crate::worker::Worker;

impl Worker {
    /// Network-first, for documents.
    ///
    /// Fresh wins; a copy of every success lands in the runtime
    /// namespace. On failure fall back to the runtime copy, then the
    /// offline sentinel, then a synthetic 503.
    pub(crate) async fn network_first(&self, req: OriginRequest) -> ServedResponse {
        let key = req.cache_key();
        match self.origin.fetch(&req, FetchMode::NoStore).await {
            Ok(response) => {
                self.runtime_put(response.to_record(key)).await;
                ServedResponse::from_origin(response)
            }
            Err(e) => {
                tracing::debug!("document fetch failed for {}: {}", req.url, e);
                if let Some(record) = self.runtime_get(&key).await {
                    return ServedResponse::from_record(record, ServedFrom::Runtime);
                }
                if let Some(record) = self.precache_get(&self.sentinel_key).await {
                    return ServedResponse::from_record(record, ServedFrom::Precache);
                }
                synthetic::service_unavailable()
            }
        }
    }

    /// Stale-while-revalidate, for assets.
    ///
    /// A cached copy answers immediately while a background fetch
    /// refreshes the slot for next time. Only a miss waits on the
    /// network; a miss with no network is a 504.
    pub(crate) async fn stale_while_revalidate(&self, req: OriginRequest) -> ServedResponse {
        let key = req.cache_key();
        if let Some(record) = self.runtime_get(&key).await {
            self.spawn_revalidate(req, key);
            return ServedResponse::from_record(record, ServedFrom::Runtime);
        }

        match self.origin.fetch(&req, FetchMode::Default).await {
            Ok(response) => {
                self.runtime_put(response.to_record(key)).await;
                ServedResponse::from_origin(response)
            }
            Err(e) => {
                tracing::debug!("asset fetch failed for {}: {}", req.url, e);
                synthetic::gateway_timeout()
            }
        }
    }

    /// Cache-first, for media.
    ///
    /// A hit never touches the network. A miss fetches (accepting stale
    /// upstream copies), stores, and returns; total failure is a 504
    /// with nothing stored.
    pub(crate) async fn cache_first(&self, req: OriginRequest) -> ServedResponse {
        let key = req.cache_key();
        if let Some(record) = self.runtime_get(&key).await {
            return ServedResponse::from_record(record, ServedFrom::Runtime);
        }

        match self.origin.fetch(&req, FetchMode::PreferCache).await {
            Ok(response) => {
                self.runtime_put(response.to_record(key)).await;
                ServedResponse::from_origin(response)
            }
            Err(e) => {
                tracing::debug!("media fetch failed for {}: {}", req.url, e);
                synthetic::gateway_timeout()
            }
        }
    }

    /// Refresh one runtime slot in the background.
    ///
    /// The caller has already answered; this task's only effect is a
    /// best-effort store write, so every failure ends at a debug log.
    fn spawn_revalidate(&self, req: OriginRequest, key: String) {
        let origin = Arc::clone(&self.origin);
        let store = self.store.clone();
        let cache_name = self.names.runtime.clone();

        tokio::spawn(async move {
            let response = match origin.fetch(&req, FetchMode::Default).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::debug!("revalidation fetch failed for {}: {}", req.url, e);
                    return;
                }
            };

            let record = response.to_record(key);
            let result = match store.open_cache(&cache_name).await {
                Ok(cache) => cache.put(&record).await,
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                tracing::debug!("revalidation write dropped for {}: {}", req.url, e);
            }
        });
    }

    pub(crate) async fn runtime_get(&self, key: &str) -> Option<ResponseRecord> {
        self.cache_get(&self.names.runtime, key).await
    }

    pub(crate) async fn precache_get(&self, key: &str) -> Option<ResponseRecord> {
        self.cache_get(&self.names.precache, key).await
    }

    async fn cache_get(&self, name: &str, key: &str) -> Option<ResponseRecord> {
        let result = match self.store.open_cache(name).await {
            Ok(cache) => cache.get(key).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!("cache read failed in {}: {}", name, e);
                None
            }
        }
    }

    async fn runtime_put(&self, record: ResponseRecord) {
        let result = match self.store.open_cache(&self.names.runtime).await {
            Ok(cache) => cache.put(&record).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            tracing::debug!("cache write dropped for {}: {}", record.url, e);
        }
    }
}
