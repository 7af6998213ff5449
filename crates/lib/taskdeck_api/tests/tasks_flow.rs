//! Integration tests for the owner-scoped task CRUD surface.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{read_json, register_and_login, send_json, test_app};

fn task_body(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "description": "something to do",
        "due_date": "2026-09-01T12:00:00Z",
    })
}

#[tokio::test]
async fn create_and_list_round_trip() {
    let app = test_app();
    let token = register_and_login(&app, "a@x.com", "alice").await;

    let created = send_json(&app, "POST", "/tasks", Some(&token), Some(task_body("buy milk"))).await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = read_json(created).await;
    assert_eq!(created["title"], "buy milk");
    assert_eq!(created["status"], "TODO");
    assert!(created["id"].is_string());

    let listed = send_json(&app, "GET", "/tasks", Some(&token), None).await;
    assert_eq!(listed.status(), StatusCode::OK);
    let listed = read_json(listed).await;
    let listed = listed.as_array().expect("list is an array");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], created["id"]);
}

#[tokio::test]
async fn create_with_explicit_status() {
    let app = test_app();
    let token = register_and_login(&app, "a@x.com", "alice").await;

    let response = send_json(
        &app,
        "POST",
        "/tasks",
        Some(&token),
        Some(json!({
            "title": "ship release",
            "description": "cut and publish",
            "status": "IN_PROGRESS",
            "due_date": "2026-09-01T12:00:00Z",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["status"], "IN_PROGRESS");
}

#[tokio::test]
async fn get_returns_the_single_task() {
    let app = test_app();
    let token = register_and_login(&app, "a@x.com", "alice").await;

    let created = send_json(&app, "POST", "/tasks", Some(&token), Some(task_body("buy milk"))).await;
    let created = read_json(created).await;
    let id = created["id"].as_str().expect("id");

    let fetched = send_json(&app, "GET", &format!("/tasks/{id}"), Some(&token), None).await;
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched = read_json(fetched).await;
    assert_eq!(fetched["title"], "buy milk");
}

#[tokio::test]
async fn partial_update_changes_only_the_given_fields() {
    let app = test_app();
    let token = register_and_login(&app, "a@x.com", "alice").await;

    let created = send_json(&app, "POST", "/tasks", Some(&token), Some(task_body("buy milk"))).await;
    let created = read_json(created).await;
    let id = created["id"].as_str().expect("id");

    let updated = send_json(
        &app,
        "PUT",
        &format!("/tasks/{id}"),
        Some(&token),
        Some(json!({ "status": "COMPLETED" })),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let updated = read_json(updated).await;
    assert_eq!(updated["status"], "COMPLETED");
    assert_eq!(updated["title"], "buy milk");
    assert_eq!(updated["description"], "something to do");
}

#[tokio::test]
async fn empty_update_is_rejected() {
    let app = test_app();
    let token = register_and_login(&app, "a@x.com", "alice").await;

    let created = send_json(&app, "POST", "/tasks", Some(&token), Some(task_body("buy milk"))).await;
    let created = read_json(created).await;
    let id = created["id"].as_str().expect("id");

    let response = send_json(
        &app,
        "PUT",
        &format!("/tasks/{id}"),
        Some(&token),
        Some(json!({})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = test_app();
    let token = register_and_login(&app, "a@x.com", "alice").await;

    let created = send_json(&app, "POST", "/tasks", Some(&token), Some(task_body("buy milk"))).await;
    let created = read_json(created).await;
    let id = created["id"].as_str().expect("id");

    let deleted = send_json(&app, "DELETE", &format!("/tasks/{id}"), Some(&token), None).await;
    assert_eq!(deleted.status(), StatusCode::OK);
    let deleted = read_json(deleted).await;
    assert_eq!(deleted["success"], true);

    let fetched = send_json(&app, "GET", &format!("/tasks/{id}"), Some(&token), None).await;
    assert_eq!(fetched.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn tasks_are_isolated_per_user() {
    let app = test_app();
    let alice = register_and_login(&app, "a@x.com", "alice").await;
    let bob = register_and_login(&app, "b@x.com", "bob").await;

    let created = send_json(&app, "POST", "/tasks", Some(&alice), Some(task_body("buy milk"))).await;
    let created = read_json(created).await;
    let id = created["id"].as_str().expect("id");

    let listed = send_json(&app, "GET", "/tasks", Some(&bob), None).await;
    let listed = read_json(listed).await;
    assert!(listed.as_array().expect("array").is_empty());

    let fetched = send_json(&app, "GET", &format!("/tasks/{id}"), Some(&bob), None).await;
    assert_eq!(fetched.status(), StatusCode::NOT_FOUND);

    let deleted = send_json(&app, "DELETE", &format!("/tasks/{id}"), Some(&bob), None).await;
    assert_eq!(deleted.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_task_id_is_a_bad_request() {
    let app = test_app();
    let token = register_and_login(&app, "a@x.com", "alice").await;

    let response = send_json(&app, "GET", "/tasks/not-an-object-id", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_status_value_is_a_bad_request() {
    let app = test_app();
    let token = register_and_login(&app, "a@x.com", "alice").await;

    let response = send_json(
        &app,
        "POST",
        "/tasks",
        Some(&token),
        Some(json!({
            "title": "x",
            "description": "y",
            "status": "DONE",
            "due_date": "2026-09-01T12:00:00Z",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
