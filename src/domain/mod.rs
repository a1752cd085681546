//! Domain layer with core business entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Pure domain services.
pub mod services;

pub use entities::{FetchedImage, SourceUrl, StorageKey, StoredObject};
pub use errors::{ErrorKind, MirrorError};
pub use ports::{ImageFetchPort, ObjectStorePort};
pub use services::{SourcePolicy, UrlValidator};
