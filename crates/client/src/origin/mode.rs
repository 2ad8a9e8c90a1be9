//! Cache-mode hints for origin fetches.

/// How a fetch should interact with intermediate HTTP caches.
///
/// Each caching strategy has a fixed mode: documents refuse upstream
/// copies, assets take the standard rules, media prefers whatever an
/// upstream cache already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Standard caching rules, no hint sent.
    Default,

    /// Bypass upstream caches and force a fresh response.
    NoStore,

    /// Accept an upstream cached response of any age.
    PreferCache,
}

impl FetchMode {
    /// The `Cache-Control` request directive this mode sends, if any.
    pub fn cache_control(self) -> Option<&'static str> {
        match self {
            FetchMode::Default => None,
            FetchMode::NoStore => Some("no-cache"),
            FetchMode::PreferCache => Some("max-stale"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sends_no_directive() {
        assert_eq!(FetchMode::Default.cache_control(), None);
    }

    #[test]
    fn test_no_store_forces_fresh() {
        assert_eq!(FetchMode::NoStore.cache_control(), Some("no-cache"));
    }

    #[test]
    fn test_prefer_cache_accepts_stale() {
        assert_eq!(FetchMode::PreferCache.cache_control(), Some("max-stale"));
    }
}
