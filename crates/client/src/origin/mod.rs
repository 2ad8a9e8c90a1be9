//! Origin fetch pipeline behind a trait seam.
//!
//! ### Fetch hardening
//! - Request timeout, limited redirects
//! - Max body bytes: 5MB (configurable)
//! - Non-success statuses are reported as errors, never as responses
//!
//! ### Cache modes
//! Strategies pick a [`FetchMode`]; the client maps it onto request
//! `Cache-Control` hints, since any intermediate HTTP cache sits upstream
//! of this process.

pub mod mode;
pub mod request;
pub mod response;

pub use mode::FetchMode;
pub use request::OriginRequest;
pub use response::OriginResponse;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, header};

use awning_core::{AppConfig, Error};

/// Upstream fetch abstraction used by every caching strategy.
///
/// The production implementation is [`HttpOrigin`]; tests substitute a
/// scripted origin.
#[async_trait]
pub trait Origin: Send + Sync {
    /// Fetch a request from the upstream origin.
    ///
    /// # Errors
    ///
    /// Fails on network errors, on non-success statuses, and on bodies
    /// exceeding the configured size cap. Callers treat every error the
    /// same way: the network did not produce a usable response.
    async fn fetch(&self, req: &OriginRequest, mode: FetchMode) -> Result<OriginResponse, Error>;
}

/// Configuration for the HTTP origin client.
#[derive(Debug, Clone)]
pub struct OriginConfig {
    /// User agent string (default: "awning/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            user_agent: "awning/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
        }
    }
}

impl From<&AppConfig> for OriginConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            max_redirects: config.max_redirects,
        }
    }
}

/// HTTP origin client with safety limits.
pub struct HttpOrigin {
    http: Client,
    config: OriginConfig,
}

impl HttpOrigin {
    /// Create a new origin client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: OriginConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Fetch(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &OriginConfig {
        &self.config
    }
}

#[async_trait]
impl Origin for HttpOrigin {
    async fn fetch(&self, req: &OriginRequest, mode: FetchMode) -> Result<OriginResponse, Error> {
        let start = Instant::now();

        let mut request = self
            .http
            .request(req.method.clone(), req.url.clone())
            .headers(req.headers.clone());

        if let Some(directive) = mode.cache_control() {
            request = request.header(header::CACHE_CONTROL, directive);
        }
        if mode == FetchMode::NoStore {
            request = request.header(header::PRAGMA, "no-cache");
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("network error: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }

        let content_length = response.content_length();
        if let Some(len) = content_length
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!(
                "{} bytes exceeds {}",
                len, self.config.max_bytes
            )));
        }

        let final_url = response.url().clone();
        let headers = response.headers().clone();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Fetch(format!("failed to read response: {}", e)))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!(
                "{} bytes exceeds {}",
                bytes.len(),
                self.config.max_bytes
            )));
        }

        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            "fetched {} -> {} in {}ms ({} bytes)",
            req.url,
            final_url,
            fetch_ms,
            bytes.len()
        );

        Ok(OriginResponse { url: req.url.clone(), final_url, status, content_type, bytes, headers, fetch_ms })
    }
}
