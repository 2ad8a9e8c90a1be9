//! Responses returned to the requester.

use awning_client::header::{HeaderMap, HeaderName, HeaderValue};
use awning_client::{Bytes, OriginResponse, StatusCode, header};
use awning_core::ResponseRecord;

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServedFrom {
    /// Fresh from the origin.
    Network,

    /// The runtime namespace.
    Runtime,

    /// The precache namespace (offline sentinel).
    Precache,

    /// Built in-process because nothing else could answer.
    Synthetic,
}

/// A response handed back to the requester by a strategy.
#[derive(Debug, Clone)]
pub struct ServedResponse {
    /// HTTP status.
    pub status: StatusCode,

    /// Response headers.
    pub headers: HeaderMap,

    /// Body bytes.
    pub body: Bytes,

    /// Provenance, for logging and tests.
    pub served_from: ServedFrom,
}

impl ServedResponse {
    /// Replay a stored record.
    ///
    /// Stored header pairs are parsed best-effort; pairs that no longer
    /// form valid header data are skipped. An out-of-range stored status
    /// falls back to 200.
    pub fn from_record(record: ResponseRecord, served_from: ServedFrom) -> Self {
        let mut headers = HeaderMap::new();
        for (name, value) in &record.headers {
            if let (Ok(name), Ok(value)) = (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
                headers.insert(name, value);
            }
        }

        Self {
            status: StatusCode::from_u16(record.status).unwrap_or(StatusCode::OK),
            headers,
            body: Bytes::from(record.body),
            served_from,
        }
    }

    /// Pass a fresh origin response through.
    pub fn from_origin(response: OriginResponse) -> Self {
        Self {
            status: response.status,
            headers: response.headers,
            body: response.bytes,
            served_from: ServedFrom::Network,
        }
    }

    /// Convenience accessor for the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }
}
