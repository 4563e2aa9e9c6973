//! Integration tests for CLI authentication
//!
//! Tests the login token exchange and identity lookup using wiremock

mod common;

use common::TestContext;
use oxidir_engine::error::EngineError;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

// =============================================================================
// Auth Model Tests
// =============================================================================

#[test]
fn test_login_response_deserialization() {
    use oxidir_cli::models::LoginResponse;

    let json = r#"{
        "access_token": "eyJhbGciOiJIUzI1NiJ9.e30.x",
        "token_type": "bearer",
        "expires_in": 3600
    }"#;

    let response: LoginResponse = serde_json::from_str(json).unwrap();
    assert_eq!(response.access_token, "eyJhbGciOiJIUzI1NiJ9.e30.x");
    assert_eq!(response.token_type, "bearer");
    assert_eq!(response.expires_in, Some(3600));
}

#[test]
fn test_login_response_without_expiry() {
    use oxidir_cli::models::LoginResponse;

    let json = r#"{"access_token": "tok", "token_type": "bearer"}"#;

    let response: LoginResponse = serde_json::from_str(json).unwrap();
    assert_eq!(response.expires_in, None);
}

#[test]
fn test_error_body_deserialization() {
    use oxidir_cli::models::ApiErrorBody;

    let body: ApiErrorBody =
        serde_json::from_str(r#"{"detail": "invalid credentials"}"#).unwrap();
    assert_eq!(body.detail, "invalid credentials");
}

// =============================================================================
// Login Flow Tests
// =============================================================================

#[tokio::test]
async fn test_login_exchanges_password_for_token() {
    let ctx = TestContext::anonymous().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({
            "username": "admin",
            "password": "hunter2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "issued-token",
            "token_type": "bearer",
            "expires_in": 3600
        })))
        .mount(&ctx.server)
        .await;

    let credentials = ctx.client().login("admin", "hunter2").await.unwrap();

    assert_eq!(credentials.access_token, "issued-token");
    assert_eq!(credentials.token_type, "bearer");
    assert!(!credentials.is_expired());
}

#[tokio::test]
async fn test_login_rejects_invalid_credentials() {
    let ctx = TestContext::anonymous().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "invalid credentials"})),
        )
        .mount(&ctx.server)
        .await;

    let err = ctx.client().login("admin", "wrong").await.unwrap_err();

    assert!(err.is_auth_failure());
    match err {
        EngineError::AuthenticationFailed { message } => {
            assert_eq!(message, "invalid credentials");
        }
        other => panic!("expected authentication failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_short_lived_token_counts_as_expired() {
    let ctx = TestContext::anonymous().await;

    // Lifetime below the clock-skew buffer; treated as already expired
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "short",
            "token_type": "bearer",
            "expires_in": 5
        })))
        .mount(&ctx.server)
        .await;

    let credentials = ctx.client().login("admin", "hunter2").await.unwrap();

    assert!(credentials.is_expired());
}

// =============================================================================
// Identity Lookup Tests
// =============================================================================

#[tokio::test]
async fn test_me_identifies_the_session_owner() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/api/me"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": "admin"})))
        .mount(&ctx.server)
        .await;

    let me = ctx.client().me().await.unwrap();

    assert_eq!(me.username, "admin");
}

#[tokio::test]
async fn test_me_without_session_is_not_authenticated() {
    let ctx = TestContext::anonymous().await;

    let result = ctx.client().me().await;

    assert!(matches!(result, Err(EngineError::NotAuthenticated)));
    assert!(ctx.server.received_requests().await.unwrap().is_empty());
}
