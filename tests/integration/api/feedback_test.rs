//! Feedback API integration tests
//!
//! Public submission and profile routes, and the verified owner routes.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use anonbox::backend::auth::sessions::TokenCodec;
use anonbox::backend::store::UserStore;

use crate::assert_api_error;
use crate::common::*;

async fn post_feedback(app: &TestApp, username: &str, content: &str) -> axum_test::TestResponse {
    app.server
        .post(&format!("/u/{}", username))
        .json(&json!({ "content": content }))
        .await
}

#[tokio::test]
async fn test_alice_scenario() {
    let app = TestApp::new();
    let session = signed_in(&app, "alice", "alice@example.com").await;

    let response = post_feedback(&app, "alice", "You give great code reviews").await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(
        response.json::<Value>(),
        json!({ "message": "Feedback submitted successfully", "success": true })
    );

    let (name, value) = bearer(&session.access_token);
    let response = app.server.get("/messages").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let messages: Vec<Value> = response.json();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["content"], "You give great code reviews");
    assert!(messages[0].get("recipient_id").is_none());

    let (name, value) = bearer(&session.access_token);
    let response = app
        .server
        .patch("/toggle-messages")
        .add_header(name, value)
        .json(&json!({ "is_accepting_messages": false }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["is_accepting_messages"], false);

    let response = post_feedback(&app, "alice", "Are you still there?").await;
    assert_api_error!(
        response,
        StatusCode::FORBIDDEN,
        "This user is not accepting feedback at the moment"
    );

    let profile = app.server.get("/u/alice").await;
    assert_eq!(
        profile.json::<Value>(),
        json!({ "username": "alice", "is_accepting_messages": false })
    );
}

#[tokio::test]
async fn test_messages_are_newest_first() {
    let app = TestApp::new();
    let session = signed_in(&app, "alice", "alice@example.com").await;

    post_feedback(&app, "alice", "first").await;
    post_feedback(&app, "alice", "second").await;

    let (name, value) = bearer(&session.access_token);
    let messages: Vec<Value> = app.server.get("/messages").add_header(name, value).await.json();
    let contents: Vec<&str> = messages.iter().filter_map(|m| m["content"].as_str()).collect();
    assert_eq!(contents, vec!["second", "first"]);

    let (name, value) = bearer(&session.access_token);
    let count = app.server.get("/messages/count").add_header(name, value).await;
    assert_eq!(count.json::<Value>(), json!({ "count": 2 }));
}

#[tokio::test]
async fn test_unknown_or_unverified_recipient_is_not_found() {
    let app = TestApp::new();
    register_for_token(&app, "pending", "pending@example.com").await;

    for username in ["nobody", "pending"] {
        let response = post_feedback(&app, username, "hello").await;
        assert_api_error!(response, StatusCode::NOT_FOUND, "User not found");

        let response = app.server.get(&format!("/u/{}", username)).await;
        assert_api_error!(response, StatusCode::NOT_FOUND, "User not found");
    }
}

#[tokio::test]
async fn test_feedback_content_limits() {
    let app = TestApp::new();
    register_and_verify(&app, "alice", "alice@example.com").await;

    let response = post_feedback(&app, "alice", "").await;
    let body = assert_api_error!(response, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "content");

    let response = post_feedback(&app, "alice", &"x".repeat(1001)).await;
    assert_api_error!(response, StatusCode::UNPROCESSABLE_ENTITY);

    let response = post_feedback(&app, "alice", &"x".repeat(1000)).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_delete_only_own_messages() {
    let app = TestApp::new();
    let alice = signed_in(&app, "alice", "alice@example.com").await;
    let bob = signed_in(&app, "bobby", "bob@example.com").await;

    post_feedback(&app, "alice", "for alice").await;
    let (name, value) = bearer(&alice.access_token);
    let messages: Vec<Value> = app.server.get("/messages").add_header(name, value).await.json();
    let message_id = messages[0]["id"].as_str().unwrap().to_string();

    let (name, value) = bearer(&bob.access_token);
    let response = app
        .server
        .delete(&format!("/messages/{}", message_id))
        .add_header(name, value)
        .await;
    assert_api_error!(response, StatusCode::NOT_FOUND, "Message not found");

    let (name, value) = bearer(&alice.access_token);
    let response = app
        .server
        .delete(&format!("/messages/{}", message_id))
        .add_header(name, value)
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let (name, value) = bearer(&alice.access_token);
    let response = app
        .server
        .delete(&format!("/messages/{}", message_id))
        .add_header(name, value)
        .await;
    assert_api_error!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_owner_routes_require_credentials() {
    let app = TestApp::new();

    for path in ["/messages", "/messages/count", "/dashboard"] {
        let response = app.server.get(path).await;
        assert_api_error!(response, StatusCode::UNAUTHORIZED, "Could not validate credentials");
    }

    let (name, value) = bearer("garbage");
    let response = app.server.get("/messages").add_header(name, value).await;
    assert_api_error!(response, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_owner_routes_require_verified_email() {
    let app = TestApp::new();
    register_for_token(&app, "pending", "pending@example.com").await;

    let user = app
        .store
        .find_user_by_username("pending")
        .await
        .unwrap()
        .unwrap();
    let access = TokenCodec::new(&app.settings.auth).issue_access(&user).unwrap();

    let (name, value) = bearer(&access);
    let response = app.server.get("/messages").add_header(name, value).await;
    assert_api_error!(
        response,
        StatusCode::FORBIDDEN,
        "Email not verified. Please verify your email to access this resource."
    );
}

#[tokio::test]
async fn test_dashboard() {
    let app = TestApp::new();
    let session = signed_in(&app, "alice", "alice@example.com").await;
    post_feedback(&app, "alice", "one").await;

    let (name, value) = bearer(&session.access_token);
    let response = app.server.get("/dashboard").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["feedback_link"], "http://app.test/u/alice");
    assert_eq!(body["message_count"], 1);
    assert_eq!(body["user"]["username"], "alice");
}

#[tokio::test]
async fn test_toggle_back_on_accepts_again() {
    let app = TestApp::new();
    let session = signed_in(&app, "alice", "alice@example.com").await;

    for accepting in [false, true] {
        let (name, value) = bearer(&session.access_token);
        let response = app
            .server
            .patch("/toggle-messages")
            .add_header(name, value)
            .json(&json!({ "is_accepting_messages": accepting }))
            .await;
        assert_eq!(response.json::<Value>()["is_accepting_messages"], accepting);
    }

    let response = post_feedback(&app, "alice", "welcome back").await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
}
