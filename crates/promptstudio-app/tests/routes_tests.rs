use std::path::Path;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use promptstudio_app::routes::create_router;
use promptstudio_app::{AppState, Settings};
use tower::ServiceExt;

fn test_settings(data_dir: &Path) -> Settings {
    Settings {
        openrouter_api_key: String::new(),
        openrouter_base_url: "http://127.0.0.1:1".to_string(),
        openrouter_timeout: Duration::from_secs(1),
        http_referer: None,
        x_title: None,
        brave_api_key: None,
        jina_api_key: None,
        data_dir: data_dir.to_path_buf(),
    }
}

fn test_router(data_dir: &Path) -> Router {
    let state = AppState::new(test_settings(data_dir)).unwrap();
    create_router(state)
}

#[tokio::test]
async fn health_reports_status_and_request_id() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_router(dir.path())
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn request_id_is_propagated_when_supplied() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_router(dir.path())
        .oneshot(
            Request::get("/health")
                .header("x-request-id", "corr-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "corr-123");
}

#[tokio::test]
async fn chat_stream_without_key_is_an_sse_warning() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_router(dir.path())
        .oneshot(
            Request::get("/api/chat/stream?model=openai/gpt-4o-mini&prompt=Hi")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );
}

#[tokio::test]
async fn chat_stream_requires_model() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_router(dir.path())
        .oneshot(
            Request::get("/api/chat/stream?prompt=Hi")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn providers_listing_and_guides() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(dir.path());

    let response = router
        .clone()
        .oneshot(Request::get("/api/providers").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(
            Request::get("/api/providers/anthropic/guide")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(
            Request::get("/api/providers/unknown/guide")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn optimize_and_refresh_require_api_key() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(dir.path());

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/optimize")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"model":"openai/gpt-4o-mini","kind":"user","prompt":"hi"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(
            Request::post("/api/models/refresh")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn saves_round_trip_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(dir.path());

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/saves")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"title":"t","kind":"system","data":{"system_prompt":"x"}}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(Request::get("/api/saves").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let missing = uuid::Uuid::new_v4();
    let response = router
        .oneshot(
            Request::get(format!("/api/saves/{missing}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_model_info_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_router(dir.path())
        .oneshot(
            Request::get("/api/models/openai/gpt-4o-mini/info")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
