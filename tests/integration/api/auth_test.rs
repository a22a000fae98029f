//! Authentication API integration tests
//!
//! Tests for registration, verification, login, refresh, logout and the
//! availability probes.

use axum::http::{header::WWW_AUTHENTICATE, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::*;
use crate::{assert_api_error, assert_contains};

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::new();

    let response = register(&app, "alice", "alice@example.com").await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({
            "message": "User registered successfully. Please check your email to verify your account.",
            "username": "alice",
            "email": "alice@example.com",
        })
    );

    let mail = app.mail_to("alice@example.com", 1).await;
    assert_contains!(mail.body, "http://api.test/auth/verify-email?token=");
    assert_contains!(mail.body, "24 hours");
}

#[tokio::test]
async fn test_register_duplicates() {
    let app = TestApp::new();
    register(&app, "alice", "alice@example.com").await;

    let response = register(&app, "alice", "other@example.com").await;
    assert_api_error!(response, StatusCode::CONFLICT, "Username already taken");

    let response = register(&app, "alice2", "alice@example.com").await;
    assert_api_error!(response, StatusCode::CONFLICT, "Email already registered");
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new();

    let cases = [
        (json!({"username": "al", "email": "a@example.com", "password": "secret1"}), "username"),
        (json!({"username": "bad name", "email": "a@example.com", "password": "secret1"}), "username"),
        (json!({"username": "alice", "email": "not-an-email", "password": "secret1"}), "email"),
        (json!({"username": "alice", "email": "a@example.com", "password": "12345"}), "password"),
    ];

    for (payload, field) in cases {
        let response = app.server.post("/auth/register").json(&payload).await;
        let body = assert_api_error!(response, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], field);
    }

    assert_eq!(app.store.user_count().await, 0);
}

#[tokio::test]
async fn test_register_succeeds_when_mail_is_down() {
    let app = TestApp::new();
    app.mailer.fail_sends(true);

    let response = register(&app, "alice", "alice@example.com").await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_full_flow_issues_distinct_tokens() {
    let app = TestApp::new();
    register_and_verify(&app, "alice", "alice@example.com").await;

    let first = login(&app, "alice").await;
    let second = login(&app, "alice@example.com").await;

    assert_eq!(first.refresh_token, first.cookie_token);
    assert_ne!(first.access_token, second.access_token);
    assert_ne!(first.refresh_token, second.refresh_token);
}

#[tokio::test]
async fn test_login_response_shape() {
    let app = TestApp::new();
    register_and_verify(&app, "alice", "alice@example.com").await;

    let response = login_request(&app, "alice", TEST_PASSWORD).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["is_verified"], true);
    assert!(body["user"].get("password_hash").is_none());

    let cookie = response
        .headers()
        .get(axum::http::header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .to_string();
    assert_contains!(cookie, "HttpOnly");
    assert_contains!(cookie, "Secure");
    assert_contains!(cookie, "SameSite=Lax");
    assert_contains!(cookie, "Max-Age=604800");
}

#[tokio::test]
async fn test_login_accepts_username_field() {
    let app = TestApp::new();
    register_and_verify(&app, "alice", "alice@example.com").await;

    let response = app
        .server
        .post("/auth/login")
        .json(&json!({ "username": "alice", "password": TEST_PASSWORD }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_verify_twice_is_idempotent() {
    let app = TestApp::new();
    let token = register_for_token(&app, "alice", "alice@example.com").await;

    let first = verify(&app, &token).await;
    assert_eq!(first.status_code(), StatusCode::OK);
    assert_eq!(first.json::<Value>()["message"], "Email verified successfully");

    let second = verify(&app, &token).await;
    assert_eq!(second.status_code(), StatusCode::OK);
    assert_eq!(second.json::<Value>()["message"], "Email already verified");

    let welcome = app.mail_to("alice@example.com", 2).await;
    assert_contains!(welcome.body, "http://app.test/u/alice");
}

#[tokio::test]
async fn test_verify_rejects_bad_tokens() {
    let app = TestApp::new();
    register_for_token(&app, "alice", "alice@example.com").await;

    let response = verify(&app, "not-a-token").await;
    assert_api_error!(response, StatusCode::BAD_REQUEST);

    // Session tokens are not verification tokens
    register_and_verify(&app, "bobby", "bob@example.com").await;
    let session = login(&app, "bobby").await;
    let response = verify(&app, &session.access_token).await;
    assert_api_error!(response, StatusCode::BAD_REQUEST);
    let response = verify(&app, &session.refresh_token).await;
    assert_api_error!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_token_for_one_user_never_verifies_another() {
    let app = TestApp::new();
    let alice_token = register_for_token(&app, "alice", "alice@example.com").await;
    register_for_token(&app, "bobby", "bob@example.com").await;

    assert_eq!(verify(&app, &alice_token).await.status_code(), StatusCode::OK);

    let response = login_request(&app, "bobby", TEST_PASSWORD).await;
    assert_api_error!(response, StatusCode::FORBIDDEN);
    let response = login_request(&app, "alice", TEST_PASSWORD).await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_unverified_login_is_forbidden() {
    let app = TestApp::new();
    register_for_token(&app, "alice", "alice@example.com").await;

    let response = login_request(&app, "alice", TEST_PASSWORD).await;
    let body = assert_api_error!(response, StatusCode::FORBIDDEN);
    assert_contains!(body["error"].as_str().unwrap(), "not verified");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    register_and_verify(&app, "alice", "alice@example.com").await;

    let wrong_password = login_request(&app, "alice", "wrong-pass").await;
    let unknown_user = login_request(&app, "nobody", TEST_PASSWORD).await;

    assert_eq!(wrong_password.headers().get(WWW_AUTHENTICATE).unwrap(), "Bearer");
    let wrong_body =
        assert_api_error!(wrong_password, StatusCode::UNAUTHORIZED, "Incorrect username or password");
    let unknown_body = assert_api_error!(unknown_user, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_refresh_rotates_twice() {
    let app = TestApp::new();
    let session = signed_in(&app, "alice", "alice@example.com").await;

    let (name, value) = refresh_cookie(&session.cookie_token);
    let first = app.server.post("/auth/refresh").add_header(name, value).await;
    assert_eq!(first.status_code(), StatusCode::OK);
    let first = session_from(&first);

    let (name, value) = refresh_cookie(&first.cookie_token);
    let second = app.server.post("/auth/refresh").add_header(name, value).await;
    assert_eq!(second.status_code(), StatusCode::OK);
    let second = session_from(&second);

    assert_ne!(first.access_token, session.access_token);
    assert_ne!(first.cookie_token, session.cookie_token);
    assert_ne!(second.access_token, first.access_token);
    assert_ne!(second.cookie_token, first.cookie_token);
}

#[tokio::test]
async fn test_refresh_rejections() {
    let app = TestApp::new();
    let session = signed_in(&app, "alice", "alice@example.com").await;

    let response = app.server.post("/auth/refresh").await;
    assert_api_error!(response, StatusCode::UNAUTHORIZED, "Could not validate credentials");

    // An access token is not a refresh token
    let (name, value) = refresh_cookie(&session.access_token);
    let response = app.server.post("/auth/refresh").add_header(name, value).await;
    assert_api_error!(response, StatusCode::UNAUTHORIZED, "Could not validate credentials");

    let (name, value) = refresh_cookie("garbage");
    let response = app.server.post("/auth/refresh").add_header(name, value).await;
    assert_api_error!(response, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_is_not_a_bearer_token() {
    let app = TestApp::new();
    let session = signed_in(&app, "alice", "alice@example.com").await;

    let (name, value) = bearer(&session.refresh_token);
    let response = app.server.get("/messages").add_header(name, value).await;
    assert_api_error!(response, StatusCode::UNAUTHORIZED, "Could not validate credentials");

    let (name, value) = bearer(&session.access_token);
    let response = app.server.get("/messages").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = TestApp::new();

    let response = app.server.post("/auth/logout").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(axum::http::header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("refresh_token=;"));
    assert_contains!(cookie, "Max-Age=0");
}

#[tokio::test]
async fn test_resend_supersedes_previous_link() {
    let app = TestApp::new();
    let original = register_for_token(&app, "alice", "alice@example.com").await;

    let response = app
        .server
        .post("/auth/resend-verification")
        .json(&json!({ "email": "alice@example.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let fresh = token_from_body(&app.mail_to("alice@example.com", 2).await.body);
    assert_ne!(fresh, original);

    assert_api_error!(verify(&app, &original).await, StatusCode::BAD_REQUEST);
    assert_eq!(verify(&app, &fresh).await.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_resend_cases() {
    let app = TestApp::new();

    let unknown = app
        .server
        .post("/auth/resend-verification")
        .json(&json!({ "email": "ghost@example.com" }))
        .await;
    assert_eq!(unknown.status_code(), StatusCode::OK);

    register_and_verify(&app, "alice", "alice@example.com").await;
    let verified = app
        .server
        .post("/auth/resend-verification")
        .json(&json!({ "email": "alice@example.com" }))
        .await;
    assert_api_error!(verified, StatusCode::CONFLICT);

    register_for_token(&app, "bobby", "bob@example.com").await;
    app.mailer.fail_sends(true);
    let mail_down = app
        .server
        .post("/auth/resend-verification")
        .json(&json!({ "email": "bob@example.com" }))
        .await;
    assert_api_error!(mail_down, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_availability_ignores_case() {
    let app = TestApp::new();
    register(&app, "Alice", "Alice@Example.com").await;

    let response = app
        .server
        .get("/auth/check-username")
        .add_query_param("username", "alice")
        .await;
    assert_eq!(response.json::<Value>()["available"], false);

    let response = app
        .server
        .get("/auth/check-username")
        .add_query_param("username", "bobby")
        .await;
    assert_eq!(response.json::<Value>()["available"], true);

    let response = app
        .server
        .get("/auth/check-email")
        .add_query_param("email", "ALICE@example.com")
        .await;
    assert_eq!(response.json::<Value>()["available"], false);
}

#[tokio::test]
async fn test_health_and_fallback() {
    let app = TestApp::new();

    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "ok");

    let response = app.server.get("/does-not-exist").await;
    assert_api_error!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_undecodable_requests_get_json_errors() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/auth/login")
        .json(&json!({ "password": TEST_PASSWORD }))
        .await;
    assert_api_error!(response, StatusCode::UNPROCESSABLE_ENTITY);

    let response = app.server.post("/auth/register").text("alice").await;
    assert_api_error!(response, StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let response = app.server.get("/auth/verify-email").await;
    let body = assert_api_error!(response, StatusCode::BAD_REQUEST);
    assert_contains!(body["error"].as_str().unwrap_or_default(), "token");
}
