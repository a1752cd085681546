//! Mirror-image use case: the write path of the cache.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::application::dto::{CacheOutcome, CacheRequest};
use crate::domain::entities::ObjectMetadata;
use crate::domain::errors::MirrorError;
use crate::domain::ports::{ImageFetchPort, ObjectStorePort};
use crate::domain::services::{UrlValidator, key_deriver};

/// Orchestrates validate -> fetch -> derive -> persist.
#[derive(Clone)]
pub struct MirrorImageUseCase {
    validator: UrlValidator,
    fetcher: Arc<dyn ImageFetchPort>,
    store: Arc<dyn ObjectStorePort>,
}

impl MirrorImageUseCase {
    /// Creates a new mirror use case.
    #[must_use]
    pub fn new(
        validator: UrlValidator,
        fetcher: Arc<dyn ImageFetchPort>,
        store: Arc<dyn ObjectStorePort>,
    ) -> Self {
        Self {
            validator,
            fetcher,
            store,
        }
    }

    /// Mirrors the requested image and returns where it now lives.
    ///
    /// # Errors
    /// Returns a validation error before any network traffic when the URL
    /// is not an acceptable source reference; otherwise propagates fetch
    /// and storage errors untouched.
    pub async fn execute(&self, request: CacheRequest) -> Result<CacheOutcome, MirrorError> {
        let source = self.validator.parse(&request.url).ok_or_else(|| {
            warn!(url = %request.url, "Rejected source URL");
            MirrorError::validation(format!(
                "not an acceptable source URL: {}",
                request.url
            ))
        })?;

        debug!(url = %source, "Source URL validated, fetching");

        let image = self.fetcher.fetch(&source).await.map_err(|e| {
            warn!(url = %source, error = %e, "Fetch failed");
            e
        })?;

        // The key hashes the ORIGINAL url, not the variant that succeeded,
        // so repeats converge on one path.
        let key = key_deriver::derive(source.as_str(), &image.extension, Utc::now());
        let path = key.path();

        self.store
            .put(
                &path,
                image.bytes.clone(),
                ObjectMetadata::immutable(&image.content_type),
            )
            .await
            .map_err(|e| {
                warn!(path = %path, error = %e, "Storage write failed");
                e
            })?;

        info!(
            path = %path,
            size = image.bytes.len(),
            content_type = %image.content_type,
            "Image mirrored"
        );

        Ok(CacheOutcome {
            original_url: request.url,
            final_url: image.final_url,
            hash: key.short_hash,
            path,
            content_type: image.content_type,
        })
    }
}
