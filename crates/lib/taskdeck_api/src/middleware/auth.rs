//! Bearer-token authentication middleware.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use mongodb::bson::oid::ObjectId;

use taskdeck_core::models::TokenClaims;

use crate::AppState;
use crate::error::AppError;

/// Claims of the authenticated caller, inserted as a request extension by
/// [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub TokenClaims);

impl AuthenticatedUser {
    /// The caller's user id, parsed from the token subject.
    pub fn user_id(&self) -> Result<ObjectId, AppError> {
        ObjectId::parse_str(&self.0.sub)
            .map_err(|_| AppError::Unauthorized("Invalid token subject".into()))
    }
}

/// Rejects the request unless it carries a valid, non-revoked bearer token.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".into()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization scheme".into()))?;

    let claims = state
        .auth
        .verify_token(token)
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".into()))?;

    if state.auth.is_revoked(&claims.jti).await? {
        return Err(AppError::Unauthorized("Token has been revoked".into()));
    }

    request.extensions_mut().insert(AuthenticatedUser(claims));
    Ok(next.run(request).await)
}
