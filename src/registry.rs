//! Registry of supported container format versions.
//!
//! The registry is built once at startup from the compiled-in versions and
//! never mutated, so concurrent lookups need no synchronization. The
//! dispatcher consults it before any cryptographic work happens, and its
//! rendered version list goes straight into the "unsupported version"
//! error message.

/// Immutable set of supported format versions.
pub struct VersionRegistry {
    /// Sorted, deduplicated version numbers.
    versions: Vec<u16>,

    /// Ascending, comma-separated rendering for error messages.
    description: String,
}

impl VersionRegistry {
    /// Builds a registry from the compiled-in version numbers.
    #[must_use]
    pub fn new(versions: &[u16]) -> Self {
        let mut versions = versions.to_vec();
        versions.sort_unstable();
        versions.dedup();

        let description = versions.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");

        Self { versions, description }
    }

    /// Returns true if `version` is supported by this build.
    #[inline]
    #[must_use]
    pub fn is_supported(&self, version: u16) -> bool {
        self.versions.binary_search(&version).is_ok()
    }

    /// Returns the supported versions in ascending order, comma-separated.
    #[inline]
    #[must_use]
    pub fn describe(&self) -> &str {
        &self.description
    }
}
