//! Domain entity definitions.

mod cached_object;
mod source_url;
mod storage_key;

pub use cached_object::{
    FALLBACK_CACHE_CONTROL, IMMUTABLE_CACHE_CONTROL, ObjectMetadata, StoredObject,
};
pub use source_url::{FetchAttempt, FetchedImage, SourceUrl};
pub use storage_key::StorageKey;
