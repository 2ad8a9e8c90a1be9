//! Path-based request classification.
//!
//! Every intercepted GET is assigned to exactly one category, evaluated
//! in priority order: the exclusion list first, then documents, then
//! assets, then media. Anything left over is not intercepted.

use awning_client::Url;
use awning_core::AppConfig;
use regex::Regex;

/// Classification result driving strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Matches the exclusion list; never intercepted, never cached.
    Excluded,

    /// Page navigation; served network-first.
    Document,

    /// Script or stylesheet; served stale-while-revalidate.
    Asset,

    /// Image, icon, or font; served cache-first.
    Media,

    /// Nothing we recognize; never intercepted.
    Unhandled,
}

/// Compiled classification rules.
///
/// Built once from configuration at worker construction; classification
/// itself is pure and synchronous.
#[derive(Debug)]
pub struct ClassifierRules {
    exclude: Option<Regex>,
    asset_extensions: Vec<String>,
    media_extensions: Vec<String>,
}

impl ClassifierRules {
    /// Compile rules from configuration.
    ///
    /// The exclusion fragments become one alternation matched against the
    /// path, each hit terminated at a word boundary, so `aisles` doesn't
    /// trip a fragment `ai`. Matching is case-sensitive; extension
    /// comparison is not.
    ///
    /// # Errors
    ///
    /// Returns the regex error if the exclusion pattern fails to compile.
    /// Fragments are escaped, so in practice this only fires on a fragment
    /// list large enough to exceed the compiled size limit.
    pub fn from_config(config: &AppConfig) -> Result<Self, regex::Error> {
        let exclude = if config.exclude_fragments.is_empty() {
            None
        } else {
            let alternatives: Vec<String> = config.exclude_fragments.iter().map(|f| regex::escape(f)).collect();
            Some(Regex::new(&format!(r"/(?:{})\b", alternatives.join("|")))?)
        };

        Ok(Self {
            exclude,
            asset_extensions: config.asset_extensions.iter().map(|e| e.to_ascii_lowercase()).collect(),
            media_extensions: config.media_extensions.iter().map(|e| e.to_ascii_lowercase()).collect(),
        })
    }

    /// Classify a request by URL path and Accept header.
    ///
    /// First match wins: exclusion beats everything, including an `.html`
    /// suffix; the document checks beat extension checks. A request is a
    /// document if its Accept header wants `text/html`, its path ends in
    /// `.html`, or its path is the root.
    pub fn classify(&self, url: &Url, accept: Option<&str>) -> Category {
        let path = url.path();

        if let Some(exclude) = &self.exclude
            && exclude.is_match(path)
        {
            return Category::Excluded;
        }

        if accept.is_some_and(|a| a.contains("text/html")) || path.ends_with(".html") || path == "/" {
            return Category::Document;
        }

        match extension(path) {
            Some(ext) if self.asset_extensions.iter().any(|e| *e == ext) => Category::Asset,
            Some(ext) if self.media_extensions.iter().any(|e| *e == ext) => Category::Media,
            _ => Category::Unhandled,
        }
    }
}

/// Extension of the final path segment, lowercased.
///
/// A segment without a dot, or with nothing after its last dot, has no
/// extension. Dots in earlier segments don't count.
fn extension(path: &str) -> Option<String> {
    let segment = path.rsplit('/').next()?;
    let (_, ext) = segment.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ClassifierRules {
        let config = AppConfig {
            exclude_fragments: vec!["matches".into(), "news".into(), "odds".into(), "odds_next".into()],
            ..AppConfig::default()
        };
        ClassifierRules::from_config(&config).unwrap()
    }

    fn classify(url: &str, accept: Option<&str>) -> Category {
        rules().classify(&Url::parse(url).unwrap(), accept)
    }

    #[test]
    fn test_excluded_fragment() {
        assert_eq!(classify("https://app.test/matches", None), Category::Excluded);
        assert_eq!(classify("https://app.test/api/odds_next?round=3", None), Category::Excluded);
    }

    #[test]
    fn test_exclusion_beats_document_suffix() {
        assert_eq!(classify("https://app.test/news.html", None), Category::Excluded);
    }

    #[test]
    fn test_exclusion_beats_accept_header() {
        assert_eq!(classify("https://app.test/news", Some("text/html")), Category::Excluded);
    }

    #[test]
    fn test_exclusion_needs_word_boundary() {
        assert_eq!(classify("https://app.test/oddsmaker.html", None), Category::Document);
    }

    #[test]
    fn test_exclusion_is_case_sensitive() {
        assert_eq!(classify("https://app.test/News", None), Category::Unhandled);
    }

    #[test]
    fn test_document_by_accept_header() {
        assert_eq!(
            classify("https://app.test/standings-page", Some("text/html,application/xhtml+xml;q=0.9")),
            Category::Document
        );
    }

    #[test]
    fn test_document_by_suffix_and_root() {
        assert_eq!(classify("https://app.test/about.html", None), Category::Document);
        assert_eq!(classify("https://app.test/", None), Category::Document);
    }

    #[test]
    fn test_asset_extensions() {
        assert_eq!(classify("https://app.test/app.js", None), Category::Asset);
        assert_eq!(classify("https://app.test/mod.mjs", None), Category::Asset);
        assert_eq!(classify("https://app.test/SKIN.CSS", None), Category::Asset);
    }

    #[test]
    fn test_media_extensions() {
        assert_eq!(classify("https://app.test/logo.png", None), Category::Media);
        assert_eq!(classify("https://app.test/fonts/main.woff2", None), Category::Media);
        assert_eq!(classify("https://app.test/pic.JPEG", None), Category::Media);
    }

    #[test]
    fn test_query_string_does_not_hide_extension() {
        assert_eq!(classify("https://app.test/app.js?v=123", None), Category::Asset);
    }

    #[test]
    fn test_unhandled_paths() {
        assert_eq!(classify("https://app.test/api/data", None), Category::Unhandled);
        assert_eq!(classify("https://app.test/export.json", None), Category::Unhandled);
    }

    #[test]
    fn test_dot_in_directory_is_not_an_extension() {
        assert_eq!(classify("https://app.test/v1.2/data", None), Category::Unhandled);
    }

    #[test]
    fn test_empty_exclusion_list_disables_exclusion() {
        let rules = ClassifierRules::from_config(&AppConfig::default()).unwrap();
        let url = Url::parse("https://app.test/matches").unwrap();
        assert_eq!(rules.classify(&url, None), Category::Unhandled);
    }

    #[test]
    fn test_extension_helper() {
        assert_eq!(extension("/a/b/skin.css"), Some("css".to_string()));
        assert_eq!(extension("/archive.tar.gz"), Some("gz".to_string()));
        assert_eq!(extension("/trailing."), None);
        assert_eq!(extension("/no-dot"), None);
        assert_eq!(extension("/a.b/c"), None);
    }
}
