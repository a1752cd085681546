//! Request/response shapes for the caching workflow.

use serde::Deserialize;

/// Body of a cache request.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheRequest {
    /// The source CDN URL to mirror.
    pub url: String,
}

/// Result of a successful mirror operation.
#[derive(Debug, Clone)]
pub struct CacheOutcome {
    /// The URL as received from the caller.
    pub original_url: String,
    /// The URL variant the fetch ultimately succeeded with.
    pub final_url: String,
    /// Short hash component of the storage path.
    pub hash: String,
    /// Full storage path the object was persisted under.
    pub path: String,
    /// Content type recorded with the object.
    pub content_type: String,
}
