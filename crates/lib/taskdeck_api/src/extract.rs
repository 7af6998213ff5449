//! Request extractors.

use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON extractor whose rejection maps to the 400 validation error of the
/// application taxonomy instead of axum's default 422.
#[derive(Debug, Clone, Copy, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
