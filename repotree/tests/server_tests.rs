// End-to-end tests for the HTTP surface, backed by a simulated contents API

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderValue, Request, StatusCode};
use repotree::{AppState, ServerConfig, router};
use serde_json::{Value, json};
use std::time::Duration;
use tower::ServiceExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const PREFIX: &str = "/repos/octo/repo/contents/";
const REPO_URL: &str = "https://github.com/octo/repo";

fn app_for(server: &MockServer) -> Router {
    let config = ServerConfig {
        api_base: server.uri(),
        workers: 4,
        ..ServerConfig::default()
    };
    let state = AppState::from_config(&config).unwrap();
    router(state, config.origin_headers().unwrap())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn mount_json(server: &MockServer, rel: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("{}{}", PREFIX, rel)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, rel: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("{}{}", PREFIX, rel)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

// ============================================================================
// GET /
// ============================================================================

#[tokio::test]
async fn test_root_greeting() {
    let server = MockServer::start().await;
    let (status, body) = get(app_for(&server), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap().starts_with("Hello"));
}

// ============================================================================
// GET /repo-files/
// ============================================================================

#[tokio::test]
async fn test_repo_files_lists_three_levels() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "",
        json!([
            {"path": "README.md", "type": "file"},
            {"path": "a", "type": "dir"},
        ]),
    )
    .await;
    mount_json(
        &server,
        "a",
        json!([
            {"path": "a/one.txt", "type": "file"},
            {"path": "a/b", "type": "dir"},
        ]),
    )
    .await;
    mount_json(
        &server,
        "a/b",
        json!([
            {"path": "a/b/two.txt", "type": "file"},
            {"path": "a/b/c", "type": "dir"},
        ]),
    )
    .await;
    mount_json(&server, "a/b/c", json!([{"path": "a/b/c/three.txt", "type": "file"}])).await;

    let (status, body) = get(
        app_for(&server),
        &format!("/repo-files/?repo_url={}", REPO_URL),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let mut names: Vec<String> = serde_json::from_value(body).unwrap();
    names.sort();
    assert_eq!(
        names,
        vec!["README.md", "a/b/c/three.txt", "a/b/two.txt", "a/one.txt"]
    );
}

#[tokio::test]
async fn test_repo_files_empty_repository() {
    let server = MockServer::start().await;
    mount_json(&server, "", json!([])).await;

    let (status, body) = get(
        app_for(&server),
        &format!("/repo-files/?repo_url={}", REPO_URL),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_repo_files_404_in_any_level_is_404() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "",
        json!([
            {"path": "x.txt", "type": "file"},
            {"path": "fine", "type": "dir"},
            {"path": "vanished", "type": "dir"},
        ]),
    )
    .await;
    mount_json(&server, "fine", json!([{"path": "fine/y.txt", "type": "file"}])).await;
    mount_status(&server, "vanished", 404).await;

    let (status, body) = get(
        app_for(&server),
        &format!("/repo-files/?repo_url={}", REPO_URL),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "not found"}));
}

#[tokio::test]
async fn test_repo_files_upstream_status_is_forwarded() {
    let server = MockServer::start().await;
    mount_status(&server, "", 403).await;

    let (status, body) = get(
        app_for(&server),
        &format!("/repo-files/?repo_url={}", REPO_URL),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "error during fetching file name.: 403.");
}

#[tokio::test]
async fn test_repo_files_malformed_listing_is_400() {
    let server = MockServer::start().await;
    mount_json(&server, "", json!({"type": "file", "path": "README.md"})).await;

    let (status, _) = get(
        app_for(&server),
        &format!("/repo-files/?repo_url={}", REPO_URL),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_repo_files_invalid_url_is_400() {
    let server = MockServer::start().await;
    let (status, body) = get(
        app_for(&server),
        "/repo-files/?repo_url=https://example.com/octo/repo",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"detail": "invalid github repo url."}));
}

#[tokio::test]
async fn test_repo_files_missing_parameter_is_400() {
    let server = MockServer::start().await;
    let (status, body) = get(app_for(&server), "/repo-files/").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "missing query parameter: repo_url");
}

#[tokio::test]
async fn test_repo_files_malformed_query_uses_detail_shape() {
    let server = MockServer::start().await;
    let (status, body) = get(
        app_for(&server),
        &format!("/repo-files/?repo_url={0}&repo_url={0}", REPO_URL),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("repo_url"), "{}", detail);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_repo_files_without_trailing_slash() {
    let server = MockServer::start().await;
    mount_json(&server, "", json!([{"path": "only.txt", "type": "file"}])).await;

    let (status, body) = get(
        app_for(&server),
        &format!("/repo-files?repo_url={}", REPO_URL),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["only.txt"]));
}

// ============================================================================
// GET /file-content/
// ============================================================================

#[tokio::test]
async fn test_file_content_text() {
    let server = MockServer::start().await;
    // "hello world\n"
    mount_json(&server, "readme.txt", json!({"content": "aGVsbG8g\nd29ybGQK\n"})).await;

    let (status, body) = get(
        app_for(&server),
        &format!("/file-content/?repo_url={}&file_path=readme.txt", REPO_URL),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "data": {
                "content": "hello world\n",
                "type": "text",
                "extension": "txt",
                "filename": "readme.txt",
            }
        })
    );
}

#[tokio::test]
async fn test_file_content_image_is_verbatim() {
    let server = MockServer::start().await;
    let raw = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAAB\n";
    mount_json(&server, "assets/image.png", json!({"content": raw})).await;

    let (status, body) = get(
        app_for(&server),
        &format!(
            "/file-content/?repo_url={}&file_path=assets/image.png",
            REPO_URL
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["type"], "image");
    assert_eq!(body["data"]["content"], raw);
    assert_eq!(body["data"]["extension"], "png");
    assert_eq!(body["data"]["filename"], "assets/image.png");
}

#[tokio::test]
async fn test_file_content_not_utf8_is_unsupported() {
    let server = MockServer::start().await;
    mount_json(&server, "data.bin", json!({"content": "//79"})).await;

    let (status, body) = get(
        app_for(&server),
        &format!("/file-content/?repo_url={}&file_path=data.bin", REPO_URL),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"success": false, "error": "File format is not supported for viewing"})
    );
}

#[tokio::test]
async fn test_file_content_missing_file_is_404() {
    let server = MockServer::start().await;
    mount_status(&server, "ghost.txt", 404).await;

    let (status, body) = get(
        app_for(&server),
        &format!("/file-content/?repo_url={}&file_path=ghost.txt", REPO_URL),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "error": "not found"}));
}

#[tokio::test]
async fn test_file_content_without_content_field_is_400() {
    let server = MockServer::start().await;
    mount_json(&server, "big.txt", json!({"path": "big.txt", "type": "file"})).await;

    let (status, body) = get(
        app_for(&server),
        &format!("/file-content/?repo_url={}&file_path=big.txt", REPO_URL),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No content found");
}

#[tokio::test]
async fn test_file_content_missing_file_path_is_400() {
    let server = MockServer::start().await;
    let (status, body) = get(
        app_for(&server),
        &format!("/file-content/?repo_url={}", REPO_URL),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "missing query parameter: file_path");
}

#[tokio::test]
async fn test_file_content_invalid_repo_url_is_400() {
    let server = MockServer::start().await;
    let (status, body) = get(
        app_for(&server),
        "/file-content/?repo_url=octo/repo&file_path=a.txt",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid github repo url.");
}

#[tokio::test]
async fn test_file_content_malformed_query_uses_envelope_shape() {
    let server = MockServer::start().await;
    let (status, body) = get(
        app_for(&server),
        &format!("/file-content/?repo_url={}&file_path=a.txt&file_path=b.txt", REPO_URL),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("file_path"));
}

#[tokio::test]
async fn test_file_content_traversal_path_is_400_without_upstream_call() {
    let server = MockServer::start().await;
    let (status, body) = get(
        app_for(&server),
        &format!("/file-content/?repo_url={}&file_path=../../../../user", REPO_URL),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_repo_files_dot_segment_owner_is_400() {
    let server = MockServer::start().await;
    let (status, body) = get(
        app_for(&server),
        "/repo-files/?repo_url=https://github.com/../x",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"detail": "invalid github repo url."}));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_repo_files_upstream_timeout_is_502_after_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PREFIX))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = ServerConfig {
        api_base: server.uri(),
        retries: 2,
        timeout: Some(Duration::from_millis(50)),
        ..ServerConfig::default()
    };
    let state = AppState::from_config(&config).unwrap();
    let app = router(state, config.origin_headers().unwrap());

    let (status, body) = get(app, &format!("/repo-files/?repo_url={}", REPO_URL)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["detail"].is_string());
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_file_content_transport_failure_is_502() {
    let config = ServerConfig {
        api_base: "http://127.0.0.1:9".to_string(),
        ..ServerConfig::default()
    };
    let state = AppState::from_config(&config).unwrap();
    let app = router(state, config.origin_headers().unwrap());

    let (status, body) = get(
        app,
        &format!("/file-content/?repo_url={}&file_path=a.txt", REPO_URL),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
}

// ============================================================================
// CORS
// ============================================================================

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let server = MockServer::start().await;
    let response = app_for(&server)
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/repo-files/")
                .header("origin", "http://localhost:5173")
                .header("access-control-request-method", "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("access-control-allow-origin"),
        Some(&HeaderValue::from_static("http://localhost:5173"))
    );
    assert_eq!(
        response.headers().get("access-control-allow-credentials"),
        Some(&HeaderValue::from_static("true"))
    );
}
