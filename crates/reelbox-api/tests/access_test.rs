mod helpers;

use axum::http::StatusCode;
use helpers::auth::{bearer, session_token, token_expiring_in, TEST_SUBJECT};
use helpers::setup_test_app;
use serde_json::Value;

#[tokio::test]
async fn test_protected_page_redirects_to_sign_in() {
    let app = setup_test_app();

    let response = app.server.get("/video-upload").await;

    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location").to_str().unwrap(), "/sign-in");
}

#[tokio::test]
async fn test_signed_in_entry_page_redirects_home() {
    let app = setup_test_app();

    let response = app.server.get("/").add_header("Authorization", bearer()).await;

    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location").to_str().unwrap(), "/home");
}

#[tokio::test]
async fn test_protected_api_without_session_is_unauthorized() {
    let app = setup_test_app();

    let response = app
        .server
        .get("/api/delivery")
        .add_query_param("assetRef", "reelbox/image-upload/abc")
        .add_query_param("kind", "image")
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_session_cookie_is_accepted() {
    let app = setup_test_app();

    let response = app
        .server
        .get("/api/delivery")
        .add_query_param("assetRef", "reelbox/image-upload/abc")
        .add_query_param("kind", "image")
        .add_query_param("social", "instagram-square")
        .add_header("Cookie", format!("__session={}", session_token(TEST_SUBJECT)))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert!(body["urls"]["downloadUrl"]
        .as_str()
        .unwrap()
        .starts_with("https://res.example.com/demo/image/upload/"));
    assert!(body["socialImageUrl"].as_str().unwrap().contains("c_fill"));
}

#[tokio::test]
async fn test_expired_token_counts_as_signed_out() {
    let app = setup_test_app();

    let response = app
        .server
        .get("/video-upload")
        .add_header(
            "Authorization",
            format!("Bearer {}", token_expiring_in(TEST_SUBJECT, -60)),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location").to_str().unwrap(), "/sign-in");
}

#[tokio::test]
async fn test_unknown_api_route_fails_closed() {
    let app = setup_test_app();

    let response = app.server.get("/api/unknown").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .get("/api/unknown")
        .add_header("Authorization", bearer())
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_asset_ref_is_bad_request() {
    let app = setup_test_app();

    let response = app
        .server
        .get("/api/delivery")
        .add_query_param("assetRef", "../etc/passwd")
        .add_query_param("kind", "image")
        .add_header("Authorization", bearer())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_is_public_and_echoes_request_id() {
    let app = setup_test_app();

    let response = app
        .server
        .get("/health")
        .add_header("x-request-id", "req-abc-123")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("x-request-id").to_str().unwrap(), "req-abc-123");
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["metadataStore"], "memory");

    app.server.get("/ready").await.assert_status_ok();
}
