//! Authentication and credential management.
//!
//! Password hashing, JWT issuance/verification, server-side token
//! revocation, and the password-reset flow.

pub mod jwt;
pub mod password;
pub mod service;

use thiserror::Error;

use crate::cache::CacheError;
use crate::store::StoreError;

pub use service::CredentialService;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Conflict(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("token error: {0}")]
    Token(String),

    #[error("invalid or expired reset token")]
    InvalidResetToken,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Credential service settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret.
    pub jwt_secret: String,
    /// Access token lifetime.
    pub access_token_ttl: chrono::Duration,
    /// Password-reset token lifetime.
    pub reset_token_ttl: std::time::Duration,
    /// Public base URL used to build reset links.
    pub public_base_url: String,
}
