//! Serve-cached use case: the read path of the cache.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::domain::entities::StoredObject;
use crate::domain::errors::MirrorError;
use crate::domain::ports::ObjectStorePort;

/// Looks up stored objects by path.
#[derive(Clone)]
pub struct ServeCachedUseCase {
    store: Arc<dyn ObjectStorePort>,
}

impl ServeCachedUseCase {
    /// Creates a new serve use case.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStorePort>) -> Self {
        Self { store }
    }

    /// Fetches the object stored at `path`, if any.
    ///
    /// Absence is a normal outcome; only backend failures error.
    ///
    /// # Errors
    /// Returns a storage error when the backend itself fails.
    pub async fn execute(&self, path: &str) -> Result<Option<StoredObject>, MirrorError> {
        let key = path.trim_start_matches('/');
        if key.is_empty() {
            return Ok(None);
        }

        let found = self.store.get(key).await?;
        match &found {
            Some(object) => debug!(path = %key, size = object.bytes.len(), "Cache hit"),
            None => trace!(path = %key, "Cache miss"),
        }
        Ok(found)
    }
}
