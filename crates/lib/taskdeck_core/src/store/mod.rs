//! Document store adapter.
//!
//! [`DocumentStore`] owns the MongoDB client (one per process, cloned by
//! handle) and hands out the typed `users` / `tasks` collections. The
//! services consume the repository ports so tests can swap in the in-memory
//! implementations from [`memory`].

pub mod memory;
pub mod mongo;

use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use thiserror::Error;
use tracing::info;

use crate::models::{Task, TaskChanges, User};

/// Maximum time to wait for server selection before failing fast.
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Document store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}

/// Connection settings for the document store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// MongoDB connection URI.
    pub uri: String,
    /// Database name.
    pub database: String,
}

/// Shared MongoDB connection handle.
#[derive(Clone)]
pub struct DocumentStore {
    client: Client,
    db: Database,
}

impl DocumentStore {
    /// Connect to MongoDB with a bounded selection timeout and verify the
    /// connection with a `ping`, so a bad URI fails at startup instead of on
    /// the first request.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
        let client = Client::with_options(options)?;
        client
            .database("admin")
            .run_command(doc! {"ping": 1})
            .await?;
        let db = client.database(&config.database);
        info!(database = %config.database, "connected to document store");
        Ok(Self { client, db })
    }

    /// The `users` collection.
    pub fn users(&self) -> Collection<User> {
        self.db.collection("users")
    }

    /// The `tasks` collection.
    pub fn tasks(&self) -> Collection<Task> {
        self.db.collection("tasks")
    }

    /// Underlying client, for shutdown hooks.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Persistence port for user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn username_exists(&self, username: &str) -> Result<bool, StoreError>;

    async fn insert(&self, user: &User) -> Result<(), StoreError>;

    /// Replace the stored password hash. Returns false when the user is absent.
    async fn set_password_hash(&self, id: &ObjectId, hash: &str) -> Result<bool, StoreError>;

    /// Apply profile changes and return the updated record.
    async fn update_username(
        &self,
        id: &ObjectId,
        username: &str,
    ) -> Result<Option<User>, StoreError>;
}

/// Persistence port for task records. Every operation is scoped to the
/// owning user.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn find_by_owner(&self, owner: &ObjectId) -> Result<Vec<Task>, StoreError>;

    async fn find_by_id(
        &self,
        owner: &ObjectId,
        id: &ObjectId,
    ) -> Result<Option<Task>, StoreError>;

    async fn insert(&self, task: &Task) -> Result<(), StoreError>;

    /// Atomically apply the supplied changes and return the updated record,
    /// or `None` when no task matches the owner-scoped filter.
    async fn update(
        &self,
        owner: &ObjectId,
        id: &ObjectId,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, StoreError>;

    /// Returns true when a task was deleted.
    async fn delete(&self, owner: &ObjectId, id: &ObjectId) -> Result<bool, StoreError>;
}
