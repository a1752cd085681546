//! Presentation layer: the HTTP boundary.

/// Request handlers.
pub mod handlers;
/// Response payloads and error rendering.
pub mod responses;
/// Route definitions.
pub mod routes;
/// Shared handler state.
pub mod state;

pub use routes::create_router;
pub use state::AppState;
