//! Response payloads and the error-to-HTTP mapping.
//!
//! The single place where error kinds become status codes; the core
//! layers never see an HTTP type.

use std::collections::BTreeMap;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::CacheOutcome;
use crate::domain::entities::FetchAttempt;
use crate::domain::errors::{ErrorKind, MirrorError};

/// Body of a successful cache response.
#[derive(Debug, Serialize)]
pub struct CacheSuccessBody {
    /// Always `"success"`.
    pub status: &'static str,
    /// Stable URL the mirrored image is now served from.
    pub cached_url: String,
    /// The URL as received from the caller.
    pub original_url: String,
    /// The URL variant the fetch succeeded with.
    pub final_url: String,
    /// Short hash component of the storage path.
    pub hash: String,
    /// Full storage path.
    pub path: String,
}

impl CacheSuccessBody {
    /// Builds the success body from a mirror outcome.
    #[must_use]
    pub fn new(outcome: CacheOutcome, cached_url: String) -> Self {
        Self {
            status: "success",
            cached_url,
            original_url: outcome.original_url,
            final_url: outcome.final_url,
            hash: outcome.hash,
            path: outcome.path,
        }
    }
}

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Always `"error"`.
    pub status: &'static str,
    /// Error kind discriminant.
    pub kind: &'static str,
    /// Human-readable failure description.
    pub message: String,
    /// Status the source last responded with, for fetch failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
    /// Every URL variant tried, in order, for fetch failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<Vec<FetchAttempt>>,
    /// Headers of the source's last response, for fetch failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_headers: Option<BTreeMap<String, String>>,
}

impl ErrorBody {
    /// Renders an error into its response body.
    #[must_use]
    pub fn from_error(error: &MirrorError) -> Self {
        let (upstream_status, attempts, upstream_headers) = match error {
            MirrorError::Fetch {
                status,
                attempts,
                headers,
                ..
            } => (*status, Some(attempts.clone()), Some(headers.clone())),
            _ => (None, None, None),
        };

        Self {
            status: "error",
            kind: error.kind().as_str(),
            message: error.message().to_string(),
            upstream_status,
            attempts,
            upstream_headers,
        }
    }
}

/// Status code an error renders with.
#[must_use]
pub fn status_for(error: &MirrorError) -> StatusCode {
    match error.kind() {
        ErrorKind::Input | ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Fetch => error
            .upstream_status()
            .and_then(|s| StatusCode::from_u16(s).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for MirrorError {
    fn into_response(self) -> Response {
        (status_for(&self), Json(ErrorBody::from_error(&self))).into_response()
    }
}

/// Maps a handler panic to the generic 500 error payload.
#[must_use]
pub fn panic_response(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let message = err
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| err.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unexpected internal error".to_string());

    tracing::error!(message = %message, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            status: "error",
            kind: "internal",
            message,
            upstream_status: None,
            attempts: None,
            upstream_headers: None,
        }),
    )
        .into_response()
}
