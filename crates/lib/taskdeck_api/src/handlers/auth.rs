//! Authentication handlers: login, logout, password reset.

use axum::Json;
use axum::extract::{Path, State};

use crate::AppState;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    LoginRequest, LoginResponse, MessageResponse, ResetCompleteBody, ResetRequestBody,
    SuccessResponse,
};

const RESET_REQUESTED_MESSAGE: &str =
    "If your email is registered, you will receive a password reset link";

/// POST /auth/login
pub async fn login_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    if body.email.is_empty() || body.password.is_empty() {
        return Err(crate::error::AppError::Validation(
            "Email and password are required".into(),
        ));
    }
    let (access_token, user) = state.auth.authenticate(&body.email, &body.password).await?;
    Ok(Json(LoginResponse {
        access_token,
        user: user.into(),
    }))
}

/// POST /auth/logout
///
/// Revokes the presented token; it stays unusable until its natural expiry.
pub async fn logout_handler(
    State(state): State<AppState>,
    axum::Extension(caller): axum::Extension<AuthenticatedUser>,
) -> AppResult<Json<SuccessResponse>> {
    state.auth.revoke(&caller.0).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// POST /auth/reset-password
///
/// The response is the same whether or not the email is registered.
pub async fn reset_request_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<ResetRequestBody>,
) -> AppResult<Json<MessageResponse>> {
    let _ = state.auth.request_password_reset(&body.email).await?;
    Ok(Json(MessageResponse {
        message: RESET_REQUESTED_MESSAGE.into(),
    }))
}

/// POST /auth/reset-password/{token}
pub async fn reset_complete_handler(
    State(state): State<AppState>,
    Path(token): Path<String>,
    AppJson(body): AppJson<ResetCompleteBody>,
) -> AppResult<Json<MessageResponse>> {
    state
        .auth
        .complete_password_reset(&token, &body.password)
        .await?;
    Ok(Json(MessageResponse {
        message: "Password has been reset".into(),
    }))
}
