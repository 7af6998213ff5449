//! User profile service.
//!
//! Profiles are strictly self-service: a requester may only read or update
//! their own record. Email and password never change through this path —
//! those go through the dedicated reset flow.

use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::models::User;
use crate::store::{StoreError, UserRepository};

/// User service errors.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("invalid user id: {0}")]
    InvalidId(String),

    #[error("user not found")]
    NotFound,

    #[error("not allowed to access this profile")]
    Forbidden,

    #[error("{0} cannot be changed via profile update")]
    Immutable(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Requested profile changes. `None` fields are left untouched; `email` and
/// `password` are carried only so attempts to change them can be rejected.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Profile reads and updates with the requester==target ownership check.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    fn parse_id(raw: &str) -> Result<ObjectId, UserError> {
        ObjectId::parse_str(raw).map_err(|_| UserError::InvalidId(raw.to_string()))
    }

    /// Fetch a profile. Only the owner may read it.
    pub async fn get_profile(
        &self,
        requester: &ObjectId,
        target: &str,
    ) -> Result<User, UserError> {
        let target = Self::parse_id(target)?;
        if target != *requester {
            return Err(UserError::Forbidden);
        }
        self.users
            .find_by_id(&target)
            .await?
            .ok_or(UserError::NotFound)
    }

    /// Apply profile changes. Only the owner may update, and only the
    /// username is mutable here.
    pub async fn update_profile(
        &self,
        requester: &ObjectId,
        target: &str,
        changes: UpdateProfile,
    ) -> Result<User, UserError> {
        let target = Self::parse_id(target)?;
        if target != *requester {
            return Err(UserError::Forbidden);
        }
        if changes.email.is_some() {
            return Err(UserError::Immutable("email"));
        }
        if changes.password.is_some() {
            return Err(UserError::Immutable("password"));
        }

        let current = self
            .users
            .find_by_id(&target)
            .await?
            .ok_or(UserError::NotFound)?;

        let username = match changes.username {
            Some(username) => username,
            None => return Ok(current),
        };
        if username.is_empty() {
            return Err(UserError::Validation("Username is required".into()));
        }
        if username != current.username && self.users.username_exists(&username).await? {
            return Err(UserError::Conflict("Username already in use".into()));
        }

        self.users
            .update_username(&target, &username)
            .await?
            .ok_or(UserError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryUserRepository;

    async fn service_with_user() -> (UserService, Arc<MemoryUserRepository>, User) {
        let repo = Arc::new(MemoryUserRepository::new());
        let user = User::new("a@x.com", "a", "hash");
        repo.insert(&user).await.unwrap();
        (UserService::new(repo.clone()), repo, user)
    }

    #[tokio::test]
    async fn owner_can_read_their_profile() {
        let (svc, _, user) = service_with_user().await;
        let profile = svc.get_profile(&user.id, &user.id.to_hex()).await.unwrap();
        assert_eq!(profile.email, "a@x.com");
    }

    #[tokio::test]
    async fn other_users_are_forbidden() {
        let (svc, _, user) = service_with_user().await;
        let stranger = ObjectId::new();
        let result = svc.get_profile(&stranger, &user.id.to_hex()).await;
        assert!(matches!(result, Err(UserError::Forbidden)));
    }

    #[tokio::test]
    async fn email_and_password_are_immutable_here() {
        let (svc, _, user) = service_with_user().await;

        let email = svc
            .update_profile(
                &user.id,
                &user.id.to_hex(),
                UpdateProfile {
                    email: Some("b@x.com".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(email, Err(UserError::Immutable("email"))));

        let password = svc
            .update_profile(
                &user.id,
                &user.id.to_hex(),
                UpdateProfile {
                    password: Some("newpassword".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(password, Err(UserError::Immutable("password"))));
    }

    #[tokio::test]
    async fn username_rename_enforces_uniqueness() {
        let (svc, repo, user) = service_with_user().await;
        repo.insert(&User::new("b@x.com", "taken", "hash"))
            .await
            .unwrap();

        let conflict = svc
            .update_profile(
                &user.id,
                &user.id.to_hex(),
                UpdateProfile {
                    username: Some("taken".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(conflict, Err(UserError::Conflict(_))));

        let renamed = svc
            .update_profile(
                &user.id,
                &user.id.to_hex(),
                UpdateProfile {
                    username: Some("fresh".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.username, "fresh");
    }

    #[tokio::test]
    async fn malformed_target_id_is_invalid() {
        let (svc, _, user) = service_with_user().await;
        let result = svc.get_profile(&user.id, "zzz").await;
        assert!(matches!(result, Err(UserError::InvalidId(_))));
    }
}
