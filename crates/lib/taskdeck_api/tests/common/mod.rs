//! Shared setup for integration tests — in-memory state, request helpers.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use taskdeck_api::{AppState, router};
use taskdeck_core::auth::{AuthConfig, CredentialService};
use taskdeck_core::cache::MemoryCache;
use taskdeck_core::mail::NoopMailer;
use taskdeck_core::store::memory::{MemoryTaskRepository, MemoryUserRepository};
use taskdeck_core::tasks::TaskService;
use taskdeck_core::users::UserService;

/// Router backed entirely by in-memory adapters.
pub fn test_app() -> Router {
    let users = Arc::new(MemoryUserRepository::new());
    let tasks = Arc::new(MemoryTaskRepository::new());
    let cache = Arc::new(MemoryCache::default());

    let state = AppState {
        auth: CredentialService::new(
            users.clone(),
            cache.clone(),
            Arc::new(NoopMailer),
            AuthConfig {
                jwt_secret: "integration-test-secret".into(),
                access_token_ttl: chrono::Duration::minutes(5),
                reset_token_ttl: std::time::Duration::from_secs(3600),
                public_base_url: "http://localhost:5173".into(),
            },
        ),
        tasks: TaskService::new(tasks, cache),
        users: UserService::new(users),
    };
    router(state)
}

/// Send a JSON request, optionally with a bearer token.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    };
    app.clone().oneshot(request).await.expect("request")
}

/// Read and parse a JSON response body.
pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse JSON")
}

/// Register a user and log in, returning the access token.
pub async fn register_and_login(app: &Router, email: &str, username: &str) -> String {
    let registered = send_json(
        app,
        "POST",
        "/users",
        None,
        Some(json!({
            "email": email,
            "username": username,
            "password": "password1",
        })),
    )
    .await;
    assert_eq!(registered.status(), StatusCode::CREATED);

    let login = send_json(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": "password1" })),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);

    let body = read_json(login).await;
    body["access_token"]
        .as_str()
        .expect("access_token is string")
        .to_string()
}
