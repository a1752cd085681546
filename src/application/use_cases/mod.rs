//! Use case implementations.

mod mirror_image_use_case;
mod serve_cached_use_case;

pub use mirror_image_use_case::MirrorImageUseCase;
pub use serve_cached_use_case::ServeCachedUseCase;
