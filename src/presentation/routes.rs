//! HTTP route definitions.

use std::sync::Arc;

use axum::Router;
use axum::routing::post;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::responses;
use super::state::AppState;

/// Creates the service router.
///
/// Everything that is not `POST /cache` falls through to the read path,
/// which serves stored objects for `GET` and 404s anything else.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/cache", post(handlers::cache_image))
        .fallback(handlers::serve_object)
        .method_not_allowed_fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(responses::panic_response))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{MirrorImageUseCase, ServeCachedUseCase};
    use crate::domain::entities::{FALLBACK_CACHE_CONTROL, FetchedImage, IMMUTABLE_CACHE_CONTROL};
    use crate::domain::ports::ImageFetchPort;
    use crate::domain::ports::mocks::MockImageFetch;
    use crate::domain::services::{SourcePolicy, UrlValidator};
    use crate::infrastructure::cdn::{CdnImageFetcher, FetcherConfig};
    use crate::infrastructure::storage::MemoryObjectStore;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PUBLIC_BASE: &str = "https://img.example.com";
    const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n fake image payload";

    fn build_router(
        policy: Arc<SourcePolicy>,
        fetcher: Arc<dyn ImageFetchPort>,
        store: Arc<MemoryObjectStore>,
    ) -> Router {
        let validator = UrlValidator::new(policy);
        let state = AppState::new(
            MirrorImageUseCase::new(validator, fetcher, store.clone()),
            ServeCachedUseCase::new(store),
            Some(PUBLIC_BASE.to_string()),
        );
        create_router(Arc::new(state))
    }

    fn wiremock_policy(server: &MockServer) -> Arc<SourcePolicy> {
        let address = server.address();
        let host = format!("{}:{}", address.ip(), address.port());
        Arc::new(SourcePolicy {
            hosts: [host.clone(), host],
            ..SourcePolicy::discord()
        })
    }

    fn cdn_router(server: &MockServer, store: Arc<MemoryObjectStore>) -> Router {
        let policy = wiremock_policy(server);
        let fetcher =
            Arc::new(CdnImageFetcher::new(policy.clone(), &FetcherConfig::default()).unwrap());
        build_router(policy, fetcher, store)
    }

    fn cache_request(url: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/cache")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "url": url }).to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_cache_then_get_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/attachments/1/2/pic.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(PNG_BYTES),
            )
            .mount(&server)
            .await;

        let store = Arc::new(MemoryObjectStore::new());
        let router = cdn_router(&server, store);

        let source_url = format!("{}/attachments/1/2/pic.png?ex=sig", server.uri());
        let response = router.clone().oneshot(cache_request(&source_url)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["original_url"], source_url.as_str());
        assert_eq!(body["hash"].as_str().unwrap().len(), 8);

        let path = body["path"].as_str().unwrap().to_string();
        assert!(path.ends_with(".png"));
        assert_eq!(
            body["cached_url"],
            format!("{PUBLIC_BASE}/{path}").as_str()
        );

        let get = Request::builder()
            .uri(format!("/{path}"))
            .body(Body::empty())
            .unwrap();
        let served = router.oneshot(get).await.unwrap();
        assert_eq!(served.status(), StatusCode::OK);
        assert_eq!(
            served.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
        assert_eq!(
            served.headers().get(header::CACHE_CONTROL).unwrap(),
            IMMUTABLE_CACHE_CONTROL
        );

        let bytes = axum::body::to_bytes(served.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(bytes.as_ref(), PNG_BYTES);
    }

    #[tokio::test]
    async fn test_unacceptable_url_rejected_without_any_fetch() {
        let fetcher = Arc::new(MockImageFetch::succeeding(FetchedImage {
            bytes: bytes::Bytes::from_static(PNG_BYTES),
            content_type: "image/png".to_string(),
            final_url: "https://cdn.discordapp.com/attachments/1/2/pic.png".to_string(),
            extension: "png".to_string(),
        }));
        let store = Arc::new(MemoryObjectStore::new());
        let router = build_router(
            Arc::new(SourcePolicy::discord()),
            fetcher.clone(),
            store.clone(),
        );

        let response = router
            .oneshot(cache_request("https://example.com/attachments/1/2/pic.png"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["kind"], "validation");

        assert_eq!(fetcher.call_count(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_is_input_error_not_500() {
        let store = Arc::new(MemoryObjectStore::new());
        let router = build_router(
            Arc::new(SourcePolicy::discord()),
            Arc::new(MockImageFetch::failing(
                crate::domain::errors::MirrorError::storage("unreachable"),
            )),
            store,
        );

        let request = Request::builder()
            .method("POST")
            .uri("/cache")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["kind"], "input");
    }

    #[tokio::test]
    async fn test_missing_url_field_is_input_error() {
        let store = Arc::new(MemoryObjectStore::new());
        let router = build_router(
            Arc::new(SourcePolicy::discord()),
            Arc::new(MockImageFetch::failing(
                crate::domain::errors::MirrorError::storage("unreachable"),
            )),
            store,
        );

        let request = Request::builder()
            .method("POST")
            .uri("/cache")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "link": "x" }).to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["kind"], "input");
    }

    #[tokio::test]
    async fn test_get_unknown_path_is_file_not_found() {
        let store = Arc::new(MemoryObjectStore::new());
        let router = build_router(
            Arc::new(SourcePolicy::discord()),
            Arc::new(MockImageFetch::failing(
                crate::domain::errors::MirrorError::storage("unreachable"),
            )),
            store.clone(),
        );

        let request = Request::builder()
            .uri("/20260805/missing.png")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(bytes.as_ref(), b"File not found");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_other_methods_are_not_found() {
        let store = Arc::new(MemoryObjectStore::new());
        let router = build_router(
            Arc::new(SourcePolicy::discord()),
            Arc::new(MockImageFetch::failing(
                crate::domain::errors::MirrorError::storage("unreachable"),
            )),
            store,
        );

        for request in [
            Request::builder()
                .method("DELETE")
                .uri("/20260805/a.png")
                .body(Body::empty())
                .unwrap(),
            Request::builder()
                .method("GET")
                .uri("/cache")
                .body(Body::empty())
                .unwrap(),
        ] {
            let response = router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            assert_eq!(bytes.as_ref(), b"Not found");
        }
    }

    #[tokio::test]
    async fn test_upstream_failure_status_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryObjectStore::new());
        let router = cdn_router(&server, store.clone());

        let source_url = format!("{}/attachments/1/2/pic.png", server.uri());
        let response = router.oneshot(cache_request(&source_url)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["kind"], "fetch");
        assert_eq!(body["upstream_status"], 404);
        assert!(body["attempts"].is_array());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_html_error_page_persists_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string("<html>denied</html>"),
            )
            .mount(&server)
            .await;

        let store = Arc::new(MemoryObjectStore::new());
        let router = cdn_router(&server, store.clone());

        let source_url = format!("{}/attachments/1/2/pic.png", server.uri());
        let response = router.oneshot(cache_request(&source_url)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["kind"], "validation");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_served_object_without_metadata_gets_defaults() {
        let store = Arc::new(MemoryObjectStore::new());
        // A filesystem object without its sidecar is the only way to
        // observe the default headers.
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("20260805")).unwrap();
        std::fs::write(temp.path().join("20260805/bare.png"), b"orphan").unwrap();

        let fs_store = Arc::new(
            crate::infrastructure::storage::FsObjectStore::new(temp.path().to_path_buf())
                .await
                .unwrap(),
        );
        let validator = UrlValidator::new(Arc::new(SourcePolicy::discord()));
        let state = AppState::new(
            MirrorImageUseCase::new(
                validator,
                Arc::new(MockImageFetch::failing(
                    crate::domain::errors::MirrorError::storage("unreachable"),
                )),
                store,
            ),
            ServeCachedUseCase::new(fs_store),
            Some(PUBLIC_BASE.to_string()),
        );
        let router = create_router(Arc::new(state));

        let request = Request::builder()
            .uri("/20260805/bare.png")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/octet-stream"
        );
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            FALLBACK_CACHE_CONTROL
        );
    }
}
