//! Application state shared across handlers.

use crate::application::{MirrorImageUseCase, ServeCachedUseCase};

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Write path: validate, fetch, persist.
    pub mirror: MirrorImageUseCase,
    /// Read path: lookup by storage path.
    pub serve: ServeCachedUseCase,
    /// Base URL for `cached_url` values; `Host`-header fallback when unset.
    pub public_base_url: Option<String>,
}

impl AppState {
    /// Creates new shared state.
    #[must_use]
    pub fn new(
        mirror: MirrorImageUseCase,
        serve: ServeCachedUseCase,
        public_base_url: Option<String>,
    ) -> Self {
        Self {
            mirror,
            serve,
            public_base_url,
        }
    }
}
