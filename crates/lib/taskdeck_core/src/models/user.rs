//! User domain model.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

/// A registered user, as persisted in the `users` collection.
///
/// The `password` field holds the bcrypt hash, never plaintext. It must not
/// cross the API boundary; the HTTP layer maps to response models that omit it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    pub username: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a new user record with freshly stamped timestamps.
    pub fn new(email: &str, username: &str, password_hash: &str) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            email: email.to_string(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}
