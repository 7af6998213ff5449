//! # taskdeck_api
//!
//! HTTP API library for Taskdeck.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use taskdeck_core::auth::CredentialService;
use taskdeck_core::tasks::TaskService;
use taskdeck_core::users::UserService;

use crate::handlers::{auth, tasks, users};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registration, login, revocation, password reset.
    pub auth: CredentialService,
    /// Owner-scoped task CRUD.
    pub tasks: TaskService,
    /// Profile reads and updates.
    pub users: UserService,
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/reset-password", post(auth::reset_request_handler))
        .route(
            "/auth/reset-password/{token}",
            post(auth::reset_complete_handler),
        )
        .route("/users", post(users::register_handler));

    // Protected routes (require a valid, non-revoked bearer token)
    let protected = Router::new()
        .route("/auth/logout", post(auth::logout_handler))
        .route(
            "/tasks",
            get(tasks::list_tasks_handler).post(tasks::create_task_handler),
        )
        .route(
            "/tasks/{id}",
            get(tasks::get_task_handler)
                .put(tasks::update_task_handler)
                .delete(tasks::delete_task_handler),
        )
        .route(
            "/users",
            get(users::get_current_user_handler).put(users::update_current_user_handler),
        )
        .route(
            "/users/{id}",
            get(users::get_user_handler).put(users::update_user_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .with_state(state)
}
