//! In-memory object store.
//!
//! Same contract as the filesystem store, backed by a lock-guarded map.
//! Used by the HTTP tests and handy for embedding.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use tracing::debug;

use crate::domain::entities::{ObjectMetadata, StoredObject};
use crate::domain::errors::MirrorError;
use crate::domain::ports::ObjectStorePort;

/// Object store holding everything in process memory.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, (Bytes, ObjectMetadata)>>,
}

impl MemoryObjectStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    /// Whether the store holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStorePort for MemoryObjectStore {
    async fn put(
        &self,
        key: &str,
        bytes: Bytes,
        metadata: ObjectMetadata,
    ) -> Result<(), MirrorError> {
        debug!(key = %key, size = bytes.len(), "Stored object in memory");
        self.objects
            .write()
            .insert(key.to_string(), (bytes, metadata));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<StoredObject>, MirrorError> {
        Ok(self
            .objects
            .read()
            .get(key)
            .map(|(bytes, meta)| StoredObject {
                bytes: bytes.clone(),
                content_type: Some(meta.content_type.clone()),
                cache_control: Some(meta.cache_control.clone()),
            }))
    }
}
