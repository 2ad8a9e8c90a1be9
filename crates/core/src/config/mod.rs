//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (AWNING_*)
//! 2. TOML config file (if AWNING_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (AWNING_*)
/// 2. TOML config file (if AWNING_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment version tag; namespace names embed it.
    ///
    /// Set via AWNING_VERSION environment variable. Bump on every deploy
    /// so stale caches get collected on activation.
    #[serde(default = "default_version")]
    pub version: String,

    /// Base URL that shell paths and intercepted paths resolve against.
    ///
    /// Set via AWNING_ORIGIN environment variable.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Path to SQLite cache database.
    ///
    /// Set via AWNING_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via AWNING_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via AWNING_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via AWNING_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of redirects to follow.
    ///
    /// Set via AWNING_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Shell paths fetched into the precache on install.
    ///
    /// Set via AWNING_SHELL_PATHS environment variable (comma-separated).
    #[serde(default = "default_shell_paths")]
    pub shell_paths: Vec<String>,

    /// Path name fragments that must never be intercepted or cached.
    ///
    /// A request whose path contains one of these fragments (terminated at
    /// a word boundary) passes straight through. Typically the app's own
    /// API roots. Set via AWNING_EXCLUDE_FRAGMENTS (comma-separated).
    #[serde(default)]
    pub exclude_fragments: Vec<String>,

    /// Extensions classified as assets (stale-while-revalidate).
    ///
    /// Set via AWNING_ASSET_EXTENSIONS environment variable (comma-separated).
    #[serde(default = "default_asset_extensions")]
    pub asset_extensions: Vec<String>,

    /// Extensions classified as media (cache-first).
    ///
    /// Set via AWNING_MEDIA_EXTENSIONS environment variable (comma-separated).
    #[serde(default = "default_media_extensions")]
    pub media_extensions: Vec<String>,

    /// HTML document served when a page request has no network and no cache.
    ///
    /// Set via AWNING_OFFLINE_HTML environment variable.
    #[serde(default = "default_offline_html")]
    pub offline_html: String,
}

fn default_version() -> String {
    "dev".into()
}

fn default_origin() -> String {
    "http://localhost:8080".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./awning-cache.sqlite")
}

fn default_user_agent() -> String {
    "awning/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_redirects() -> usize {
    5
}

fn default_shell_paths() -> Vec<String> {
    vec!["/".into(), "/index.html".into()]
}

fn default_asset_extensions() -> Vec<String> {
    ["js", "mjs", "css"].map(String::from).to_vec()
}

fn default_media_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "webp", "svg", "gif", "ico", "avif", "woff", "woff2", "ttf", "otf"]
        .map(String::from)
        .to_vec()
}

fn default_offline_html() -> String {
    concat!(
        "<!doctype html><meta charset=\"utf-8\">",
        "<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">",
        "<title>Offline</title>",
        "<main><h1>You are offline</h1>",
        "<p>Pages you already opened keep working; the rest returns with the network.</p></main>"
    )
    .into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            origin: default_origin(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            shell_paths: default_shell_paths(),
            exclude_fragments: Vec::new(),
            asset_extensions: default_asset_extensions(),
            media_extensions: default_media_extensions(),
            offline_html: default_offline_html(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `AWNING_`
    /// 2. TOML file from `AWNING_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("AWNING_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("AWNING_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
