//! Request model for origin fetches.

use awning_core::store::request_key;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

/// An outgoing request as seen by the interception layer.
#[derive(Debug, Clone)]
pub struct OriginRequest {
    /// HTTP method. Only GET requests are ever cached.
    pub method: Method,

    /// Absolute request URL.
    pub url: Url,

    /// Request headers; the Accept header participates in classification.
    pub headers: HeaderMap,
}

impl OriginRequest {
    /// A plain GET request for `url` with no extra headers.
    pub fn get(url: Url) -> Self {
        Self { method: Method::GET, url, headers: HeaderMap::new() }
    }

    /// Attach a header, builder style.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// The storage key for this request.
    ///
    /// Fragments never reach the server, so they are stripped before
    /// hashing; `/page#a` and `/page#b` share one cache slot.
    pub fn cache_key(&self) -> String {
        let mut url = self.url.clone();
        url.set_fragment(None);
        request_key(self.method.as_str(), url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header;

    #[test]
    fn test_get_builder() {
        let req = OriginRequest::get(Url::parse("https://app.test/index.html").unwrap());
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.url.path(), "/index.html");
        assert!(req.headers.is_empty());
    }

    #[test]
    fn test_with_header() {
        let req = OriginRequest::get(Url::parse("https://app.test/").unwrap())
            .with_header(header::ACCEPT, HeaderValue::from_static("text/html"));
        assert_eq!(req.headers.get(header::ACCEPT).unwrap(), "text/html");
    }

    #[test]
    fn test_cache_key_ignores_fragment() {
        let plain = OriginRequest::get(Url::parse("https://app.test/page").unwrap());
        let with_fragment = OriginRequest::get(Url::parse("https://app.test/page#section").unwrap());
        assert_eq!(plain.cache_key(), with_fragment.cache_key());
    }

    #[test]
    fn test_cache_key_keeps_query() {
        let one = OriginRequest::get(Url::parse("https://app.test/page?tab=1").unwrap());
        let two = OriginRequest::get(Url::parse("https://app.test/page?tab=2").unwrap());
        assert_ne!(one.cache_key(), two.cache_key());
    }

    #[test]
    fn test_cache_key_covers_method() {
        let url = Url::parse("https://app.test/page").unwrap();
        let get = OriginRequest::get(url.clone());
        let head = OriginRequest { method: Method::HEAD, url, headers: HeaderMap::new() };
        assert_ne!(get.cache_key(), head.cache_key());
    }
}
