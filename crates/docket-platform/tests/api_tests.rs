//! API Endpoint Tests
//!
//! Tests for:
//! - Health endpoint
//! - Docket validation, storage and lookup
//! - Registration, login, session lookup and logout

use std::sync::Arc;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use docket_platform::api::{create_router, AUTH_HEADER};
use docket_platform::repository::{MemoryDocketRepository, MemoryUserRepository};
use docket_platform::service::{Argon2Config, PasswordPolicy, TokenConfig};
use docket_platform::{DocketService, PasswordService, SchemaValidator, TokenService, UserService};

fn create_test_app() -> Router {
    let validator = Arc::new(SchemaValidator::docket().unwrap());
    let docket_service = DocketService::new(validator, Arc::new(MemoryDocketRepository::new()));

    let passwords = PasswordService::new(
        PasswordPolicy::default(),
        Argon2Config { memory_kib: 1024, iterations: 1, parallelism: 1 },
    )
    .unwrap();
    let tokens = TokenService::new(TokenConfig::new("api-test-secret")).unwrap();
    let user_service = UserService::new(
        Arc::new(MemoryUserRepository::new()),
        Arc::new(passwords),
        Arc::new(tokens),
    );

    create_router(docket_service, user_service)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed_request(method: Method, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTH_HEADER, token)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn login_event() -> Value {
    json!({
        "name": "LOGIN_EVENT",
        "application": "WEB",
        "source": "APPLICATION",
        "createdBy": "alice",
        "ipAddress": "10.0.0.1",
        "level": "INFO",
        "status": "SUCCESS",
        "eventDateTime": "2024-01-01T00:00:00Z",
        "keyDataAsJSON": "{\"sessionId\":\"abc\"}",
        "details": "ok"
    })
}

/// Register alice and return her first session token
async fn register_alice(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/users",
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "Secret123"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    response
        .headers()
        .get(AUTH_HEADER)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "UP");
}

// ============================================================================
// Dockets
// ============================================================================

#[tokio::test]
async fn test_validate_endpoint_valid() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(Method::POST, "/dockets/validate", login_event()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["valid"], true);
    assert_eq!(json["violations"], json!([]));
}

#[tokio::test]
async fn test_validate_endpoint_lists_violations() {
    let app = create_test_app();
    let mut record = login_event();
    record.as_object_mut().unwrap().remove("details");
    record["status"] = json!(500);

    let response = app
        .oneshot(json_request(Method::POST, "/dockets/validate", record))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["valid"], false);

    let violations = json["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0]["field"], "status");
    assert_eq!(violations[0]["kind"], "typeMismatch");
    assert_eq!(violations[1]["field"], "details");
    assert_eq!(violations[1]["kind"], "missing");
}

#[tokio::test]
async fn test_validate_endpoint_non_object() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(Method::POST, "/dockets/validate", json!([1, 2])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_and_get_docket() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/dockets", login_event()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["name"], "LOGIN_EVENT");
    let id = created["_id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/dockets/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_invalid_docket_is_refused() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(Method::POST, "/dockets", json!({ "name": "LOGIN_EVENT" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["error"], "SCHEMA_VIOLATION");
    assert_eq!(json["details"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn test_get_unknown_docket() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/dockets/000000000000000000000000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "NOT_FOUND");
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_register_returns_public_view_and_token() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/users",
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "Secret123"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(AUTH_HEADER));

    let json = body_json(response).await;
    assert_eq!(json["email"], "alice@example.com");
    assert!(json["_id"].is_string());
    assert!(json.get("password").is_none());
    assert!(json.get("tokens").is_none());
    assert!(json.get("username").is_none());
}

#[tokio::test]
async fn test_register_weak_password() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/users",
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "password"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = create_test_app();
    register_alice(&app).await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/users",
            json!({
                "username": "alice-two",
                "email": "alice@example.com",
                "password": "Secret123"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "DUPLICATE");
}

#[tokio::test]
async fn test_login_and_me() {
    let app = create_test_app();
    register_alice(&app).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/users/login",
            json!({ "email": "alice@example.com", "password": "Secret123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let token = response
        .headers()
        .get(AUTH_HEADER)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();

    let response = app
        .oneshot(authed_request(Method::GET, "/users/me", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["email"], "alice@example.com");
}

#[tokio::test]
async fn test_login_failures_look_alike() {
    let app = create_test_app();
    register_alice(&app).await;

    let wrong_password = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/users/login",
            json!({ "email": "alice@example.com", "password": "Wrong1234" }),
        ))
        .await
        .unwrap();
    let unknown_email = app
        .oneshot(json_request(
            Method::POST,
            "/users/login",
            json!({ "email": "nobody@example.com", "password": "Secret123" }),
        ))
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(wrong_password).await, body_json(unknown_email).await);
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/users/me").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(authed_request(Method::GET, "/users/me", "garbage"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = create_test_app();
    let token = register_alice(&app).await;

    let response = app
        .clone()
        .oneshot(authed_request(Method::DELETE, "/users/me/token", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(authed_request(Method::GET, "/users/me", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
