//! HTTP handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::application::CacheRequest;
use crate::domain::entities::FALLBACK_CACHE_CONTROL;
use crate::domain::errors::MirrorError;

use super::responses::CacheSuccessBody;
use super::state::AppState;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// `POST /cache` - mirror a source image and return its stable URL.
pub async fn cache_image(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<CacheRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return MirrorError::input(format!("invalid JSON body: {rejection}")).into_response();
        }
    };

    match state.mirror.execute(request).await {
        Ok(outcome) => {
            let cached_url = cached_url_for(&state, &headers, &outcome.path);
            (
                StatusCode::OK,
                Json(CacheSuccessBody::new(outcome, cached_url)),
            )
                .into_response()
        }
        Err(error) => error.into_response(),
    }
}

/// Fallback handler: `GET /{path}` serves a stored object; everything
/// else is unknown territory.
pub async fn serve_object(State(state): State<Arc<AppState>>, request: Request) -> Response {
    if request.method() != Method::GET {
        return not_found().await;
    }

    let path = request.uri().path().to_string();

    match state.serve.execute(&path).await {
        Ok(Some(object)) => {
            let content_type = object
                .content_type
                .as_deref()
                .and_then(|ct| HeaderValue::from_str(ct).ok())
                .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
            let cache_control = object
                .cache_control
                .as_deref()
                .and_then(|cc| HeaderValue::from_str(cc).ok())
                .unwrap_or_else(|| HeaderValue::from_static(FALLBACK_CACHE_CONTROL));

            (
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CACHE_CONTROL, cache_control),
                ],
                object.bytes,
            )
                .into_response()
        }
        Ok(None) => (StatusCode::NOT_FOUND, "File not found").into_response(),
        Err(error) => error.into_response(),
    }
}

/// Shared 404 for unknown method/path combinations.
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

/// Builds the public URL a freshly cached object is reachable at.
fn cached_url_for(state: &AppState, headers: &HeaderMap, path: &str) -> String {
    if let Some(base) = &state.public_base_url {
        return format!("{}/{path}", base.trim_end_matches('/'));
    }

    headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map_or_else(
            || format!("/{path}"),
            |host| format!("https://{host}/{path}"),
        )
}
