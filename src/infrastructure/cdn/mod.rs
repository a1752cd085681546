//! Source CDN access.
//!
//! This module provides:
//! - URL variant transforms for the fallback sequence
//! - The fetch strategist that walks those variants

pub mod fetcher;
pub mod variants;

pub use fetcher::{
    CdnImageFetcher, DEFAULT_MAX_IMAGE_BYTES, DEFAULT_TIMEOUT_SECS, FetcherConfig,
};
