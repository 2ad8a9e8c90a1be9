//! Versioned namespace naming.

/// The pair of namespace names for one deployment version.
///
/// A version change produces a fresh pair, which is what makes garbage
/// collection of old versions a pure name comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheNames {
    /// Precache namespace, `pre-{version}`.
    pub precache: String,

    /// Runtime namespace, `rt-{version}`.
    pub runtime: String,
}

impl CacheNames {
    /// Derive both namespace names from a version string.
    pub fn for_version(version: &str) -> Self {
        Self { precache: format!("pre-{version}"), runtime: format!("rt-{version}") }
    }

    /// Whether `name` is one of the two current namespaces.
    ///
    /// Anything this returns false for is garbage-collectable.
    pub fn is_current(&self, name: &str) -> bool {
        name == self.precache || name == self.runtime
    }
}
