//! Task service — owner-scoped CRUD with a read-through cached list.
//!
//! The per-owner task list lives under `tasks:{ownerId}` in the cache.
//! Reads populate it on miss; every write invalidates it. Cache read and
//! population failures degrade to the document store with a warning, but an
//! invalidation failure propagates: the one thing this service must never do
//! is knowingly serve a stale snapshot.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use thiserror::Error;
use tracing::warn;

use crate::cache::{Cache, CacheExt};
use crate::models::{CachedTask, Task, TaskChanges, TaskStatus};
use crate::store::{StoreError, TaskRepository};

/// Task service errors.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("invalid task id: {0}")]
    InvalidId(String),

    #[error("task not found")]
    NotFound,

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cache(#[from] crate::cache::CacheError),
}

/// Fields for a new task. The owner is never part of this: it is stamped
/// from the authenticated identity.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub status: Option<TaskStatus>,
    pub due_date: DateTime<Utc>,
}

/// Cache key for an owner's task list.
fn list_key(owner: &ObjectId) -> String {
    format!("tasks:{}", owner.to_hex())
}

/// Owner-scoped task CRUD coordinating the document store and the cache.
#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
    cache: Arc<dyn Cache>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskRepository>, cache: Arc<dyn Cache>) -> Self {
        Self { tasks, cache }
    }

    /// Parse a client-supplied identifier, distinguishing syntax errors from
    /// not-found.
    fn parse_id(raw: &str) -> Result<ObjectId, TaskError> {
        ObjectId::parse_str(raw).map_err(|_| TaskError::InvalidId(raw.to_string()))
    }

    /// Best-effort cached snapshot of the owner's list. Backend or decode
    /// failures are treated as a miss.
    async fn cached_list(&self, owner: &ObjectId) -> Option<Vec<CachedTask>> {
        match self.cache.get_json(&list_key(owner)).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(owner = %owner, error = %e, "task list cache read failed");
                None
            }
        }
    }

    /// Load the list from the store and repopulate the cache (best effort).
    async fn load_and_cache(&self, owner: &ObjectId) -> Result<Vec<Task>, TaskError> {
        let tasks = self.tasks.find_by_owner(owner).await?;
        let snapshot: Vec<CachedTask> = tasks.iter().cloned().map(CachedTask::from).collect();
        if let Err(e) = self.cache.put_json(&list_key(owner), &snapshot, None).await {
            warn!(owner = %owner, error = %e, "task list cache write failed");
        }
        Ok(tasks)
    }

    /// Drop the owner's cached list. Must succeed for the write to count.
    async fn invalidate(&self, owner: &ObjectId) -> Result<(), TaskError> {
        self.cache.invalidate(&list_key(owner)).await?;
        Ok(())
    }

    /// All tasks for the owner, cache first.
    pub async fn list(&self, owner: &ObjectId) -> Result<Vec<Task>, TaskError> {
        if let Some(snapshot) = self.cached_list(owner).await {
            return Ok(snapshot.into_iter().map(Task::from).collect());
        }
        self.load_and_cache(owner).await
    }

    /// A single task by id, scoped to the owner.
    ///
    /// Prefers scanning the cached list to avoid a point query; on a cache
    /// miss it falls back to the store and warms the cache with the full
    /// list as a side effect.
    pub async fn get(&self, owner: &ObjectId, raw_id: &str) -> Result<Task, TaskError> {
        let id = Self::parse_id(raw_id)?;

        if let Some(snapshot) = self.cached_list(owner).await {
            if let Some(cached) = snapshot.into_iter().find(|t| t.id == id) {
                return Ok(Task::from(cached));
            }
        }

        let task = self.tasks.find_by_id(owner, &id).await?;
        if let Err(e) = self.load_and_cache(owner).await {
            warn!(owner = %owner, error = %e, "cache warm after point query failed");
        }
        task.ok_or(TaskError::NotFound)
    }

    /// Create a task owned by `owner` and invalidate the cached list.
    pub async fn create(&self, owner: &ObjectId, fields: CreateTask) -> Result<Task, TaskError> {
        if fields.title.trim().is_empty() {
            return Err(TaskError::Validation("Title is required".into()));
        }
        if fields.description.trim().is_empty() {
            return Err(TaskError::Validation("Description is required".into()));
        }

        let now = Utc::now();
        let task = Task {
            id: ObjectId::new(),
            title: fields.title,
            description: fields.description,
            status: fields.status.unwrap_or_default(),
            due_date: fields.due_date,
            user_id: *owner,
            created_at: now,
            updated_at: now,
        };
        self.tasks.insert(&task).await?;
        self.invalidate(owner).await?;
        Ok(task)
    }

    /// Apply a partial update; unset fields stay untouched.
    pub async fn update(
        &self,
        owner: &ObjectId,
        raw_id: &str,
        changes: TaskChanges,
    ) -> Result<Task, TaskError> {
        let id = Self::parse_id(raw_id)?;
        if changes.is_empty() {
            return Err(TaskError::Validation("No updatable fields supplied".into()));
        }
        let updated = self
            .tasks
            .update(owner, &id, &changes)
            .await?
            .ok_or(TaskError::NotFound)?;
        self.invalidate(owner).await?;
        Ok(updated)
    }

    /// Delete a task and invalidate the cached list.
    pub async fn delete(&self, owner: &ObjectId, raw_id: &str) -> Result<(), TaskError> {
        let id = Self::parse_id(raw_id)?;
        if !self.tasks.delete(owner, &id).await? {
            return Err(TaskError::NotFound);
        }
        self.invalidate(owner).await?;
        Ok(())
    }
}
