//! Shared test fixtures: a scripted origin and worker builders.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use awning_client::header::{self, HeaderMap, HeaderValue};
use awning_client::{Bytes, FetchMode, Origin, OriginRequest, OriginResponse, StatusCode, Url};
use awning_core::{AppConfig, CacheStore, Error, ResponseRecord};

use crate::worker::Worker;

/// In-memory origin that serves scripted bodies and records every
/// fetch attempt.
#[derive(Default)]
pub(crate) struct FakeOrigin {
    responses: Mutex<HashMap<String, (String, Vec<u8>)>>,
    failing: Mutex<HashSet<String>>,
    offline: AtomicBool,
    log: Mutex<Vec<String>>,
}

impl FakeOrigin {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Script a 200 response for a path.
    pub(crate) fn serve(&self, path: &str, content_type: &str, body: &[u8]) {
        self.responses
            .lock()
            .unwrap()
            .insert(path.to_string(), (content_type.to_string(), body.to_vec()));
    }

    /// Make one path unreachable while the rest keep working.
    pub(crate) fn fail_path(&self, path: &str) {
        self.failing.lock().unwrap().insert(path.to_string());
    }

    /// Fail every fetch from now on.
    pub(crate) fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    /// How many times a path was fetched, including failed attempts.
    pub(crate) fn fetch_count(&self, path: &str) -> usize {
        self.log.lock().unwrap().iter().filter(|p| *p == path).count()
    }

    pub(crate) fn total_fetches(&self) -> usize {
        self.log.lock().unwrap().len()
    }
}

#[async_trait]
impl Origin for FakeOrigin {
    async fn fetch(&self, req: &OriginRequest, _mode: FetchMode) -> Result<OriginResponse, Error> {
        let path = req.url.path().to_string();
        self.log.lock().unwrap().push(path.clone());

        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::Fetch(format!("offline: {}", path)));
        }
        if self.failing.lock().unwrap().contains(&path) {
            return Err(Error::Fetch(format!("unreachable: {}", path)));
        }

        let scripted = self.responses.lock().unwrap().get(&path).cloned();
        match scripted {
            Some((content_type, body)) => {
                let mut headers = HeaderMap::new();
                if let Ok(value) = HeaderValue::from_str(&content_type) {
                    headers.insert(header::CONTENT_TYPE, value);
                }
                Ok(OriginResponse {
                    url: req.url.clone(),
                    final_url: req.url.clone(),
                    status: StatusCode::OK,
                    content_type: Some(content_type),
                    bytes: Bytes::from(body),
                    headers,
                    fetch_ms: 0,
                })
            }
            None => Err(Error::HttpStatus(404)),
        }
    }
}

/// Config pointing at the fake origin, with the exclusion list and
/// shell the strategy tests assume.
pub(crate) fn test_config(version: &str) -> AppConfig {
    AppConfig {
        version: version.to_string(),
        origin: "https://app.test".to_string(),
        shell_paths: vec!["/".to_string(), "/index.html".to_string(), "/skin.css".to_string()],
        exclude_fragments: vec![
            "matches".to_string(),
            "news".to_string(),
            "odds".to_string(),
            "odds_next".to_string(),
            "standings".to_string(),
        ],
        ..AppConfig::default()
    }
}

/// Worker over an in-memory store and a fresh [`FakeOrigin`].
pub(crate) async fn test_worker(version: &str) -> (Worker, CacheStore, Arc<FakeOrigin>) {
    let store = CacheStore::open_in_memory().await.unwrap();
    let origin = FakeOrigin::new();
    let worker = Worker::new(store.clone(), origin.clone(), &test_config(version)).unwrap();
    (worker, store, origin)
}

pub(crate) fn request(url: &str) -> OriginRequest {
    OriginRequest::get(Url::parse(url).unwrap())
}

/// The store key a GET for this URL resolves to.
pub(crate) fn key_for(url: &str) -> String {
    request(url).cache_key()
}

/// A record shaped like a previously stored 200 response.
pub(crate) fn stored_record(url: &str, content_type: &str, body: &[u8]) -> ResponseRecord {
    let url = Url::parse(url).unwrap();
    ResponseRecord {
        request_key: OriginRequest::get(url.clone()).cache_key(),
        url: url.to_string(),
        status: 200,
        content_type: Some(content_type.to_string()),
        headers: vec![("content-type".to_string(), content_type.to_string())],
        body: body.to_vec(),
        stored_at: chrono::Utc::now().to_rfc3339(),
    }
}

/// Poll a cache slot until its body matches, or give up.
///
/// Background revalidation has no completion signal, so tests watch
/// the slot instead.
pub(crate) async fn wait_for_body(store: &CacheStore, cache_name: &str, key: &str, expected: &[u8]) -> bool {
    for _ in 0..200 {
        if let Ok(cache) = store.open_cache(cache_name).await
            && let Ok(Some(record)) = cache.get(key).await
            && record.body == expected
        {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    false
}
