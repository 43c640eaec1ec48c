// crates/backend-lib/tests/http_routes.rs
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use member_auth_backend::common::{MemberBody, ResultCode, RsData, TokenPair};
use member_auth_backend::config::Settings;
use member_auth_backend::{routes, AppState};
use serde::de::DeserializeOwned;
use serde_json::json;
use tower::ServiceExt;

async fn app() -> Router {
    let mut settings = Settings::default();
    settings.token.secret = "http-test-secret-0123456789abcdefgh".to_string();
    settings.hasher.log_n = 8;

    let state = AppState::from_settings(settings).unwrap();
    state.auth.join("admin", "1234").await.unwrap();
    routes::create_router(state)
}

async fn post<T: DeserializeOwned>(app: &Router, uri: &str, body: serde_json::Value) -> (StatusCode, RsData<T>) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_login_success_returns_tokens() {
    let app = app().await;
    let (status, rs) = post::<TokenPair>(
        &app,
        "/api/v1/members/login",
        json!({"username": "admin", "password": "1234"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(rs.result_code(), ResultCode::LOGIN_OK);
    let pair = rs.data().unwrap();
    assert!(!pair.access_token.is_empty());
    assert!(!pair.refresh_token.is_empty());
}

#[tokio::test]
async fn test_login_failures_map_to_bad_request() {
    let app = app().await;

    let (status, rs) = post::<TokenPair>(
        &app,
        "/api/v1/members/login",
        json!({"username": "admin", "password": "wrong"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(rs.result_code(), ResultCode::INVALID_CREDENTIAL);
    assert!(rs.data().is_none());

    let (status, rs) = post::<TokenPair>(
        &app,
        "/api/v1/members/login",
        json!({"username": "ghost", "password": "1234"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(rs.result_code(), ResultCode::MEMBER_NOT_FOUND);
}

#[tokio::test]
async fn test_blank_fields_rejected_before_lookup() {
    let app = app().await;

    let (status, rs) = post::<TokenPair>(
        &app,
        "/api/v1/members/login",
        json!({"username": "admin", "password": "  "}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(rs.result_code(), ResultCode::INVALID_INPUT);

    let (_, rs) = post::<TokenPair>(&app, "/api/v1/members/login", json!({"password": "1234"})).await;
    assert_eq!(rs.result_code(), ResultCode::INVALID_INPUT);
}

#[tokio::test]
async fn test_check_returns_username_only() {
    let app = app().await;

    let (status, rs) = post::<MemberBody>(
        &app,
        "/api/v1/members/check",
        json!({"username": "admin", "password": "1234"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rs.result_code(), ResultCode::CREDENTIALS_OK);
    assert_eq!(rs.data().unwrap().username, "admin");

    let (status, rs) = post::<MemberBody>(
        &app,
        "/api/v1/members/check",
        json!({"username": "admin", "password": "nope"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(rs.result_code(), ResultCode::INVALID_CREDENTIAL);
}

#[tokio::test]
async fn test_join_then_login() {
    let app = app().await;

    let (status, rs) = post::<MemberBody>(
        &app,
        "/api/v1/members/join",
        json!({"username": "user1", "password": "1234"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(rs.result_code(), ResultCode::JOINED);

    let (status, rs) = post::<MemberBody>(
        &app,
        "/api/v1/members/join",
        json!({"username": "user1", "password": "other"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(rs.result_code(), ResultCode::DUPLICATE_MEMBER);
    assert!(rs.data().is_none());

    let (status, _) = post::<TokenPair>(
        &app,
        "/api/v1/members/login",
        json!({"username": "user1", "password": "1234"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
