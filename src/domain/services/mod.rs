//! Pure domain services.

pub mod key_deriver;
pub mod url_validator;

pub use url_validator::{SourcePolicy, UrlValidator};
