//! Persisted object types shared by the storage adapters.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Cache-control directive written alongside every stored object.
pub const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Cache-control served when a stored object carries no metadata.
pub const FALLBACK_CACHE_CONTROL: &str = "public, max-age=31536000";

/// Metadata persisted next to an object's bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    /// Content type declared by the source at fetch time.
    pub content_type: String,
    /// Cache-control directive to serve the object with.
    pub cache_control: String,
}

impl ObjectMetadata {
    /// Metadata for a freshly mirrored image: the source's content type
    /// under the one-year immutable policy.
    #[must_use]
    pub fn immutable(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            cache_control: IMMUTABLE_CACHE_CONTROL.to_string(),
        }
    }
}

/// A stored object as returned by the read path.
///
/// Metadata fields are `None` when the backend has bytes but no sidecar
/// record; the boundary substitutes defaults.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// The object's byte content.
    pub bytes: Bytes,
    /// Recorded content type, if any.
    pub content_type: Option<String>,
    /// Recorded cache-control directive, if any.
    pub cache_control: Option<String>,
}
