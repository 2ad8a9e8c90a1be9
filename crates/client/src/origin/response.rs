//! Response model for origin fetches.

use awning_core::ResponseRecord;
use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use url::Url;

/// Response from an origin fetch.
#[derive(Debug, Clone)]
pub struct OriginResponse {
    /// The original URL requested
    pub url: Url,

    /// The final URL after redirects
    pub final_url: Url,

    /// HTTP status code
    pub status: StatusCode,

    /// Content-Type header
    pub content_type: Option<String>,

    /// Response body bytes
    pub bytes: Bytes,

    /// Response headers
    pub headers: HeaderMap,

    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

impl OriginResponse {
    /// Build the storable record of this response.
    ///
    /// The record keeps the final URL, so a redirected body is stored
    /// under the requesting key but attributed to where it came from.
    /// Header values that aren't valid UTF-8 are skipped.
    pub fn to_record(&self, request_key: String) -> ResponseRecord {
        let headers = self
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        ResponseRecord {
            request_key,
            url: self.final_url.to_string(),
            status: self.status.as_u16(),
            content_type: self.content_type.clone(),
            headers,
            body: self.bytes.to_vec(),
            stored_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
