//! Install and activate lifecycle.

use awning_client::{FetchMode, Origin, OriginRequest};
use awning_core::Error;

use crate::synthetic;
use crate::worker::Worker;

impl Worker {
    /// Populate the precache and write the offline sentinel.
    ///
    /// Shell files are fetched one at a time; each failure is logged and
    /// skipped, so one unreachable file doesn't cost the rest. Returning
    /// means the worker is ready; there is no waiting period for a
    /// previous version to let go.
    ///
    /// # Errors
    ///
    /// Only the precache itself failing (opening it, or writing the
    /// offline sentinel) aborts installation.
    pub async fn install(&self) -> Result<(), Error> {
        let precache = self.store.open_cache(&self.names.precache).await?;

        let mut stored = 0usize;
        for path in &self.shell_paths {
            let url = match self.base.join(path) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("skipping shell path {}: {}", path, e);
                    continue;
                }
            };

            let req = OriginRequest::get(url);
            let key = req.cache_key();
            let record = match self.origin.fetch(&req, FetchMode::Default).await {
                Ok(response) => response.to_record(key),
                Err(e) => {
                    tracing::warn!("skipping shell path {}: {}", path, e);
                    continue;
                }
            };

            match precache.put(&record).await {
                Ok(()) => stored += 1,
                Err(e) => tracing::warn!("skipping shell path {}: {}", path, e),
            }
        }

        let sentinel = synthetic::offline_record(&self.offline_html, &self.sentinel_url, self.sentinel_key.clone());
        precache.put(&sentinel).await?;

        tracing::info!(
            "precache {} ready ({} of {} shell files)",
            self.names.precache,
            stored,
            self.shell_paths.len()
        );

        Ok(())
    }

    /// Drop every namespace that doesn't belong to the current version.
    ///
    /// Runs when a new version takes over. The current precache and
    /// runtime namespaces are left untouched; returning means this
    /// version controls all clients immediately.
    ///
    /// # Errors
    ///
    /// Returns the first store error; namespaces already dropped stay
    /// dropped.
    pub async fn activate(&self) -> Result<(), Error> {
        for name in self.store.list_caches().await? {
            if self.names.is_current(&name) {
                continue;
            }
            let dropped = self.store.delete_cache(&name).await?;
            tracing::info!("dropped stale cache {} ({} entries)", name, dropped);
        }

        tracing::info!("version {} active", self.version());
        Ok(())
    }
}
