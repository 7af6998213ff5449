//! Application error types and HTTP status mapping.

use axum::extract::rejection::JsonRejection;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use taskdeck_core::auth::AuthError;
use taskdeck_core::cache::CacheError;
use taskdeck_core::store::StoreError;
use taskdeck_core::tasks::TaskError;
use taskdeck_core::users::UserError;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid or expired token")]
    InvalidResetToken,

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::InvalidId(m) => (StatusCode::BAD_REQUEST, "invalid_id", m.as_str()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, "forbidden", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::Conflict(m) => (StatusCode::CONFLICT, "conflict", m.as_str()),
            AppError::InvalidResetToken => (
                StatusCode::BAD_REQUEST,
                "invalid_token",
                "Invalid or expired token",
            ),
            AppError::Internal(cause) => {
                // Log the root cause; the response body stays generic.
                error!(cause = %cause, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: code.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<CacheError> for AppError {
    fn from(e: CacheError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => {
                AppError::Unauthorized("Invalid email or password".into())
            }
            AuthError::Conflict(m) => AppError::Conflict(m),
            AuthError::Validation(m) => AppError::Validation(m),
            AuthError::Token(m) => AppError::Unauthorized(m),
            AuthError::InvalidResetToken => AppError::InvalidResetToken,
            AuthError::Store(e) => AppError::from(e),
            AuthError::Cache(e) => AppError::from(e),
            AuthError::Internal(m) => AppError::Internal(m),
        }
    }
}

impl From<TaskError> for AppError {
    fn from(e: TaskError) -> Self {
        match e {
            TaskError::InvalidId(id) => AppError::InvalidId(format!("Invalid task id: {id}")),
            TaskError::NotFound => AppError::NotFound("Task not found".into()),
            TaskError::Validation(m) => AppError::Validation(m),
            TaskError::Store(e) => AppError::from(e),
            TaskError::Cache(e) => AppError::from(e),
        }
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::InvalidId(id) => AppError::InvalidId(format!("Invalid user id: {id}")),
            UserError::NotFound => AppError::NotFound("User not found".into()),
            UserError::Forbidden => {
                AppError::Forbidden("Not allowed to access this profile".into())
            }
            UserError::Immutable(field) => AppError::Validation(format!(
                "{field} cannot be changed via profile update"
            )),
            UserError::Conflict(m) => AppError::Conflict(m),
            UserError::Validation(m) => AppError::Validation(m),
            UserError::Store(e) => AppError::from(e),
        }
    }
}
