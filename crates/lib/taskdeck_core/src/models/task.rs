//! Task domain model and its cache representation.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::cache::codec::{tagged_datetime, tagged_object_id};

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
    Archived,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

impl TaskStatus {
    /// Wire/storage form of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Archived => "ARCHIVED",
        }
    }
}

/// A task, as persisted in the `tasks` collection.
///
/// `user_id` is the owning user and is always stamped from the authenticated
/// identity, never taken from client input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub due_date: DateTime<Utc>,
    pub user_id: ObjectId,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Partial update to a task. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskChanges {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
    }
}

/// Cache-layer representation of a task.
///
/// Identifiers and timestamps are serialized with type tags so the cached
/// snapshot round-trips without type loss. Decoding is strict: unknown fields
/// and mismatched tags are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CachedTask {
    #[serde(with = "tagged_object_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    #[serde(with = "tagged_datetime")]
    pub due_date: DateTime<Utc>,
    #[serde(with = "tagged_object_id")]
    pub user_id: ObjectId,
    #[serde(with = "tagged_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "tagged_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for CachedTask {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            due_date: task.due_date,
            user_id: task.user_id,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

impl From<CachedTask> for Task {
    fn from(cached: CachedTask) -> Self {
        Self {
            id: cached.id,
            title: cached.title,
            description: cached.description,
            status: cached.status,
            due_date: cached.due_date,
            user_id: cached.user_id,
            created_at: cached.created_at,
            updated_at: cached.updated_at,
        }
    }
}
