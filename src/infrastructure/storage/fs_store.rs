//! Filesystem-backed object store.
//!
//! Bytes live at `{root}/{key}`; the content-type and cache-control
//! metadata live in a JSON sidecar next to them. Writes go through a
//! temporary file and a rename so a failed write never leaves a partial
//! object behind.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::{debug, warn};

use crate::domain::entities::{ObjectMetadata, StoredObject};
use crate::domain::errors::MirrorError;
use crate::domain::ports::ObjectStorePort;

const META_SUFFIX: &str = ".meta";
const TMP_SUFFIX: &str = ".tmp";

/// Object store persisting to a local directory tree.
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Creates a store rooted at the given directory, creating it if
    /// needed.
    ///
    /// # Errors
    /// Returns a storage error if the root cannot be created.
    pub async fn new(root: PathBuf) -> Result<Self, MirrorError> {
        fs::create_dir_all(&root)
            .await
            .map_err(|e| MirrorError::storage(format!("failed to create storage root: {e}")))?;
        Ok(Self { root })
    }

    /// Resolves a key to a path under the root.
    ///
    /// Keys with traversal-shaped components resolve to `None`; they can
    /// never name a stored object.
    fn object_path(&self, key: &str) -> Option<PathBuf> {
        if key.is_empty() || key.starts_with('/') {
            return None;
        }

        let relative = Path::new(key);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }

        Some(self.root.join(relative))
    }

    /// Writes bytes to `path` via a sibling temp file and a rename.
    async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), MirrorError> {
        let tmp = tmp_path(path);

        fs::write(&tmp, bytes)
            .await
            .map_err(|e| MirrorError::storage(format!("failed to write object: {e}")))?;

        if let Err(e) = fs::rename(&tmp, path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(MirrorError::storage(format!(
                "failed to finalize object: {e}"
            )));
        }
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(TMP_SUFFIX);
    PathBuf::from(name)
}

fn meta_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(META_SUFFIX);
    PathBuf::from(name)
}

#[async_trait]
impl ObjectStorePort for FsObjectStore {
    async fn put(
        &self,
        key: &str,
        bytes: Bytes,
        metadata: ObjectMetadata,
    ) -> Result<(), MirrorError> {
        let path = self
            .object_path(key)
            .ok_or_else(|| MirrorError::storage(format!("invalid storage key: {key:?}")))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| MirrorError::storage(format!("failed to create prefix dir: {e}")))?;
        }

        Self::write_atomic(&path, &bytes).await?;

        let meta_bytes = serde_json::to_vec(&metadata)
            .map_err(|e| MirrorError::storage(format!("failed to encode metadata: {e}")))?;
        Self::write_atomic(&meta_path(&path), &meta_bytes).await?;

        debug!(key = %key, size = bytes.len(), "Stored object");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<StoredObject>, MirrorError> {
        let Some(path) = self.object_path(key) else {
            return Ok(None);
        };

        let bytes = match fs::read(&path).await {
            Ok(bytes) => Bytes::from(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(MirrorError::storage(format!(
                    "failed to read object: {e}"
                )));
            }
        };

        // A missing or corrupt sidecar is tolerated; the boundary will
        // substitute default metadata.
        let metadata = match fs::read(meta_path(&path)).await {
            Ok(raw) => match serde_json::from_slice::<ObjectMetadata>(&raw) {
                Ok(meta) => Some(meta),
                Err(e) => {
                    warn!(key = %key, error = %e, "Unreadable metadata sidecar");
                    None
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read metadata sidecar");
                None
            }
        };

        Ok(Some(StoredObject {
            bytes,
            content_type: metadata.as_ref().map(|m| m.content_type.clone()),
            cache_control: metadata.map(|m| m.cache_control),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_store() -> (FsObjectStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FsObjectStore::new(temp_dir.path().to_path_buf())
            .await
            .unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_put_and_get_round_trip() {
        let (store, _temp) = create_test_store().await;

        store
            .put(
                "20260805/abcd1234.png",
                Bytes::from_static(b"png bytes"),
                ObjectMetadata::immutable("image/png"),
            )
            .await
            .unwrap();

        let object = store.get("20260805/abcd1234.png").await.unwrap().unwrap();
        assert_eq!(object.bytes.as_ref(), b"png bytes");
        assert_eq!(object.content_type.as_deref(), Some("image/png"));
        assert_eq!(
            object.cache_control.as_deref(),
            Some(crate::domain::entities::IMMUTABLE_CACHE_CONTROL)
        );
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let (store, _temp) = create_test_store().await;
        assert!(store.get("20260805/missing.png").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_content() {
        let (store, _temp) = create_test_store().await;
        let key = "20260805/abcd1234.png";

        store
            .put(key, Bytes::from_static(b"first"), ObjectMetadata::immutable("image/png"))
            .await
            .unwrap();
        store
            .put(key, Bytes::from_static(b"second"), ObjectMetadata::immutable("image/png"))
            .await
            .unwrap();

        let object = store.get(key).await.unwrap().unwrap();
        assert_eq!(object.bytes.as_ref(), b"second");
    }

    #[tokio::test]
    async fn test_traversal_keys_never_resolve() {
        let (store, _temp) = create_test_store().await;

        assert!(store.get("../outside.png").await.unwrap().is_none());
        assert!(store.get("a/../../outside.png").await.unwrap().is_none());
        assert!(store.get("/etc/passwd").await.unwrap().is_none());

        let err = store
            .put(
                "../outside.png",
                Bytes::from_static(b"x"),
                ObjectMetadata::immutable("image/png"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::domain::errors::ErrorKind::Storage);
    }

    #[tokio::test]
    async fn test_bytes_without_sidecar_have_no_metadata() {
        let (store, temp) = create_test_store().await;

        let dir = temp.path().join("20260805");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("bare.png"), b"orphan bytes").unwrap();

        let object = store.get("20260805/bare.png").await.unwrap().unwrap();
        assert_eq!(object.bytes.as_ref(), b"orphan bytes");
        assert!(object.content_type.is_none());
        assert!(object.cache_control.is_none());
    }

    #[tokio::test]
    async fn test_no_tmp_files_left_behind() {
        let (store, temp) = create_test_store().await;

        store
            .put(
                "20260805/abcd1234.png",
                Bytes::from_static(b"data"),
                ObjectMetadata::immutable("image/png"),
            )
            .await
            .unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(temp.path().join("20260805"))
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.path().to_string_lossy().ends_with(TMP_SUFFIX))
            .collect();
        assert!(leftovers.is_empty());
    }
}
