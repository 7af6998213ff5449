//! User handlers: registration and self-service profile access.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use taskdeck_core::users::UpdateProfile;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{RegisterRequest, UpdateUserRequest, UserResponse};

/// POST /users (public)
pub async fn register_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .auth
        .register(&body.email, &body.username, &body.password)
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /users — the caller's own profile.
pub async fn get_current_user_handler(
    State(state): State<AppState>,
    axum::Extension(caller): axum::Extension<AuthenticatedUser>,
) -> AppResult<Json<UserResponse>> {
    let id = caller.user_id()?;
    let user = state.users.get_profile(&id, &id.to_hex()).await?;
    Ok(Json(user.into()))
}

/// PUT /users — update the caller's own profile.
pub async fn update_current_user_handler(
    State(state): State<AppState>,
    axum::Extension(caller): axum::Extension<AuthenticatedUser>,
    AppJson(body): AppJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let id = caller.user_id()?;
    let user = state
        .users
        .update_profile(&id, &id.to_hex(), changes_from(body))
        .await?;
    Ok(Json(user.into()))
}

/// GET /users/{id}
pub async fn get_user_handler(
    State(state): State<AppState>,
    axum::Extension(caller): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let requester = caller.user_id()?;
    let user = state.users.get_profile(&requester, &id).await?;
    Ok(Json(user.into()))
}

/// PUT /users/{id}
pub async fn update_user_handler(
    State(state): State<AppState>,
    axum::Extension(caller): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    AppJson(body): AppJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let requester = caller.user_id()?;
    let user = state
        .users
        .update_profile(&requester, &id, changes_from(body))
        .await?;
    Ok(Json(user.into()))
}

fn changes_from(body: UpdateUserRequest) -> UpdateProfile {
    UpdateProfile {
        username: body.username,
        email: body.email,
        password: body.password,
    }
}
