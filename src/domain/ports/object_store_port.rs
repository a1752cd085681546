//! Port definition for the object storage backend.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::entities::{ObjectMetadata, StoredObject};
use crate::domain::errors::MirrorError;

/// Port wrapping the external object-storage backend.
///
/// The cache is append-/overwrite-only: no listing, deletion, or update
/// operations are exposed. Absence on read is a normal outcome (`None`),
/// distinct from a backend failure. Implementations must be thread-safe
/// and `put` must be atomic per key.
#[async_trait]
pub trait ObjectStorePort: Send + Sync {
    /// Persists bytes under the given key, overwriting any prior object.
    async fn put(&self, key: &str, bytes: Bytes, metadata: ObjectMetadata)
    -> Result<(), MirrorError>;

    /// Looks up a stored object by key.
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, MirrorError>;
}
