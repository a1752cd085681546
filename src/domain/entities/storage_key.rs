//! Deterministic storage path for a cached image.

/// Storage path of the form `{datePrefix}/{shortHash}.{extension}`.
///
/// Two writes for the same underlying image (same URL sans query) on the
/// same calendar day render to the same path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey {
    /// UTC calendar date at write time, formatted `YYYYMMDD`.
    pub date_prefix: String,
    /// First 8 hex characters of SHA-256 over the parameter-stripped URL.
    pub short_hash: String,
    /// Lowercased extension of the final URL variant that succeeded.
    pub extension: String,
}

impl StorageKey {
    /// Renders the full storage path.
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}/{}.{}", self.date_prefix, self.short_hash, self.extension)
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}
