//! Synthetic responses for when nothing else can answer.

use awning_client::header::HeaderMap;
use awning_client::{Bytes, StatusCode, Url};
use awning_core::ResponseRecord;

use crate::response::{ServedFrom, ServedResponse};

/// Pseudo-path the offline sentinel is stored under.
///
/// Deliberately not a real route; the surrounding underscores keep it
/// clear of anything the app itself would serve.
pub const OFFLINE_SENTINEL_PATH: &str = "/__offline.html__";

/// 503 with a bare "Offline" body.
///
/// The last resort for a document request: no network, no runtime copy,
/// no sentinel. If install completed, this never fires.
pub fn service_unavailable() -> ServedResponse {
    ServedResponse {
        status: StatusCode::SERVICE_UNAVAILABLE,
        headers: HeaderMap::new(),
        body: Bytes::from_static(b"Offline"),
        served_from: ServedFrom::Synthetic,
    }
}

/// Empty-body 504 for asset and media requests with no cache and no network.
pub fn gateway_timeout() -> ServedResponse {
    ServedResponse {
        status: StatusCode::GATEWAY_TIMEOUT,
        headers: HeaderMap::new(),
        body: Bytes::new(),
        served_from: ServedFrom::Synthetic,
    }
}

/// The offline fallback document as a storable precache record.
pub fn offline_record(html: &str, url: &Url, request_key: String) -> ResponseRecord {
    ResponseRecord {
        request_key,
        url: url.to_string(),
        status: 200,
        content_type: Some("text/html; charset=utf-8".to_string()),
        headers: vec![("content-type".to_string(), "text/html; charset=utf-8".to_string())],
        body: html.as_bytes().to_vec(),
        stored_at: chrono::Utc::now().to_rfc3339(),
    }
}
