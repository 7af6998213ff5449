//! Integration tests for registration, login, logout, and password reset.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{read_json, register_and_login, send_json, test_app};

#[tokio::test]
async fn register_returns_the_profile_without_the_password() {
    let app = test_app();
    let response = send_json(
        &app,
        "POST",
        "/users",
        None,
        Some(json!({
            "email": "a@x.com",
            "username": "alice",
            "password": "password1",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = read_json(response).await;
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["username"], "alice");
    assert!(body["id"].is_string());
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let app = test_app();
    register_and_login(&app, "a@x.com", "alice").await;

    let response = send_json(
        &app,
        "POST",
        "/users",
        None,
        Some(json!({
            "email": "a@x.com",
            "username": "someone-else",
            "password": "password1",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_returns_token_and_user() {
    let app = test_app();
    register_and_login(&app, "a@x.com", "alice").await;

    let response = send_json(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "password1" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert!(body["access_token"].is_string());
    assert_eq!(body["user"]["email"], "a@x.com");
    assert_eq!(body["user"]["username"], "alice");
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = test_app();
    register_and_login(&app, "a@x.com", "alice").await;

    let response = send_json(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = read_json(response).await;
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn missing_login_fields_are_a_bad_request() {
    let app = test_app();
    let response = send_json(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "", "password": "" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = test_app();
    // Body claims to be JSON but has a missing field.
    let response = send_json(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "a@x.com" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let app = test_app();
    let token = register_and_login(&app, "a@x.com", "alice").await;

    let before = send_json(&app, "GET", "/tasks", Some(&token), None).await;
    assert_eq!(before.status(), StatusCode::OK);

    let logout = send_json(&app, "POST", "/auth/logout", Some(&token), None).await;
    assert_eq!(logout.status(), StatusCode::OK);

    let after = send_json(&app, "GET", "/tasks", Some(&token), None).await;
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
    let body = read_json(after).await;
    assert_eq!(body["message"], "Token has been revoked");
}

#[tokio::test]
async fn protected_routes_reject_anonymous_and_garbage_tokens() {
    let app = test_app();

    let anonymous = send_json(&app, "GET", "/tasks", None, None).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let garbage = send_json(&app, "GET", "/tasks", Some("not-a-jwt"), None).await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn reset_request_is_generic_for_any_email() {
    let app = test_app();
    register_and_login(&app, "a@x.com", "alice").await;

    let known = send_json(
        &app,
        "POST",
        "/auth/reset-password",
        None,
        Some(json!({ "email": "a@x.com" })),
    )
    .await;
    let unknown = send_json(
        &app,
        "POST",
        "/auth/reset-password",
        None,
        Some(json!({ "email": "nobody@x.com" })),
    )
    .await;

    assert_eq!(known.status(), StatusCode::OK);
    assert_eq!(unknown.status(), StatusCode::OK);
    let known = read_json(known).await;
    let unknown = read_json(unknown).await;
    assert_eq!(known["message"], unknown["message"]);
}

#[tokio::test]
async fn reset_with_a_bogus_token_fails() {
    let app = test_app();
    let response = send_json(
        &app,
        "POST",
        "/auth/reset-password/not-a-real-token",
        None,
        Some(json!({ "password": "password2" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
