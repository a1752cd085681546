//! Port definition for fetching images from the source CDN.

use async_trait::async_trait;

use crate::domain::entities::{FetchedImage, SourceUrl};
use crate::domain::errors::MirrorError;

/// Port for retrieving image bytes from the source CDN.
///
/// Implementations own the fallback strategy; callers see a single
/// attempt that either yields a validated image or a terminal error.
/// Stateless and safe to retry at the caller's discretion.
#[async_trait]
pub trait ImageFetchPort: Send + Sync {
    /// Fetches the image behind a validated source URL.
    async fn fetch(&self, source: &SourceUrl) -> Result<FetchedImage, MirrorError>;
}
