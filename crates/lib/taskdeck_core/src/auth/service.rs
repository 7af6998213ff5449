//! Credential service — registration, login, revocation, password reset.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use tracing::{info, warn};
use uuid::Uuid;

use super::{AuthConfig, AuthError, jwt, password};
use crate::cache::Cache;
use crate::mail::Mailer;
use crate::models::{TokenClaims, User};
use crate::store::UserRepository;

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 8;

/// Revocation blocklist key for a token id.
fn blocklist_key(jti: &str) -> String {
    format!("blocklist:{jti}")
}

/// Cache key for a password-reset token.
fn password_reset_key(token: &str) -> String {
    format!("password_reset:{token}")
}

/// Registration, login, token revocation, and password-reset flows.
#[derive(Clone)]
pub struct CredentialService {
    users: Arc<dyn UserRepository>,
    cache: Arc<dyn Cache>,
    mailer: Arc<dyn Mailer>,
    config: AuthConfig,
}

impl CredentialService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        cache: Arc<dyn Cache>,
        mailer: Arc<dyn Mailer>,
        config: AuthConfig,
    ) -> Self {
        Self {
            users,
            cache,
            mailer,
            config,
        }
    }

    /// Create a new user account.
    ///
    /// Email and username must each be unique across all users; the password
    /// is stored only as a bcrypt hash.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        pass: &str,
    ) -> Result<User, AuthError> {
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::Validation("A valid email is required".into()));
        }
        if username.is_empty() {
            return Err(AuthError::Validation("Username is required".into()));
        }
        if pass.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::Conflict("Email already in use".into()));
        }
        if self.users.username_exists(username).await? {
            return Err(AuthError::Conflict("Username already in use".into()));
        }

        let hash = password::hash_password(pass)?;
        let user = User::new(email, username, &hash);
        self.users.insert(&user).await?;
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Authenticate with email + password, issuing an access token.
    ///
    /// Unknown email and wrong password produce the same error so callers
    /// cannot probe for account existence.
    pub async fn authenticate(
        &self,
        email: &str,
        pass: &str,
    ) -> Result<(String, User), AuthError> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => return Err(AuthError::InvalidCredentials),
        };

        if !password::verify_password(pass, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = jwt::generate_access_token(
            &user,
            self.config.access_token_ttl,
            self.config.jwt_secret.as_bytes(),
        )?;
        Ok((token, user))
    }

    /// Verify a bearer token's signature and expiry.
    pub fn verify_token(&self, token: &str) -> Option<TokenClaims> {
        jwt::verify_access_token(token, self.config.jwt_secret.as_bytes())
    }

    /// Record the token in the revocation blocklist for its remaining
    /// lifetime. A token past its expiry needs no entry.
    pub async fn revoke(&self, claims: &TokenClaims) -> Result<(), AuthError> {
        let remaining = claims.exp - Utc::now().timestamp();
        if remaining <= 0 {
            return Ok(());
        }
        self.cache
            .put(
                &blocklist_key(&claims.jti),
                "1",
                Some(Duration::from_secs(remaining as u64)),
            )
            .await?;
        Ok(())
    }

    /// Whether the token id is present in the revocation blocklist.
    pub async fn is_revoked(&self, jti: &str) -> Result<bool, AuthError> {
        Ok(self.cache.get(&blocklist_key(jti)).await?.is_some())
    }

    /// Start a password reset.
    ///
    /// Succeeds generically whether or not the email is registered. When the
    /// user exists, a single-use token is stored with a bounded TTL and the
    /// reset link is mailed; delivery failure is logged, never surfaced.
    /// Returns the issued token for the caller that owns the flow (the HTTP
    /// layer discards it).
    pub async fn request_password_reset(&self, email: &str) -> Result<Option<String>, AuthError> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        let token = Uuid::new_v4().to_string();
        self.cache
            .put(
                &password_reset_key(&token),
                &user.id.to_hex(),
                Some(self.config.reset_token_ttl),
            )
            .await?;

        let reset_url = format!(
            "{}/reset-password/{token}",
            self.config.public_base_url.trim_end_matches('/')
        );
        if let Err(e) = self.mailer.send_password_reset(email, &reset_url).await {
            warn!(error = %e, "password reset email delivery failed");
        }

        Ok(Some(token))
    }

    /// Complete a password reset with a previously issued token.
    ///
    /// The token is single-use: it is deleted as soon as the new password is
    /// persisted.
    pub async fn complete_password_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let key = password_reset_key(token);
        let user_id = match self.cache.get(&key).await? {
            Some(raw) => ObjectId::parse_str(&raw)
                .map_err(|e| AuthError::Internal(format!("corrupt reset entry: {e}")))?,
            None => return Err(AuthError::InvalidResetToken),
        };

        let hash = password::hash_password(new_password)?;
        if !self.users.set_password_hash(&user_id, &hash).await? {
            return Err(AuthError::InvalidResetToken);
        }
        self.cache.invalidate(&key).await?;
        info!(user_id = %user_id, "password reset completed");
        Ok(())
    }
}
