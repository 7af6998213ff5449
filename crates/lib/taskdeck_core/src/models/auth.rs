//! Authentication domain models.

use serde::{Deserialize, Serialize};

/// JWT claims embedded in access tokens.
///
/// `email` and `username` are resolved from the stored user record at
/// issuance time; `jti` identifies the token for server-side revocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — user ID (hex `ObjectId`).
    pub sub: String,
    /// User email.
    pub email: String,
    /// User display name.
    pub username: String,
    /// Token identifier (UUIDv4), keyed in the revocation blocklist.
    pub jti: String,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}
