//! In-memory repository implementations.
//!
//! Back the services in unit and integration tests, where spinning up a
//! real MongoDB instance would be overkill.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use mongodb::bson::oid::ObjectId;

use super::{StoreError, TaskRepository, UserRepository};
use crate::models::{Task, TaskChanges, User};

/// User repository over a process-local map.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: DashMap<ObjectId, User>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }

    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self.users.iter().any(|u| u.username == username))
    }

    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn set_password_hash(&self, id: &ObjectId, hash: &str) -> Result<bool, StoreError> {
        match self.users.get_mut(id) {
            Some(mut user) => {
                user.password_hash = hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_username(
        &self,
        id: &ObjectId,
        username: &str,
    ) -> Result<Option<User>, StoreError> {
        match self.users.get_mut(id) {
            Some(mut user) => {
                user.username = username.to_string();
                user.updated_at = Utc::now();
                Ok(Some(user.clone()))
            }
            None => Ok(None),
        }
    }
}

/// Task repository over a process-local map.
#[derive(Default)]
pub struct MemoryTaskRepository {
    tasks: DashMap<ObjectId, Task>,
}

impl MemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for MemoryTaskRepository {
    async fn find_by_owner(&self, owner: &ObjectId) -> Result<Vec<Task>, StoreError> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| t.user_id == *owner)
            .map(|t| t.clone())
            .collect();
        tasks.sort_by_key(|t| t.created_at);
        Ok(tasks)
    }

    async fn find_by_id(
        &self,
        owner: &ObjectId,
        id: &ObjectId,
    ) -> Result<Option<Task>, StoreError> {
        Ok(self
            .tasks
            .get(id)
            .filter(|t| t.user_id == *owner)
            .map(|t| t.clone()))
    }

    async fn insert(&self, task: &Task) -> Result<(), StoreError> {
        self.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn update(
        &self,
        owner: &ObjectId,
        id: &ObjectId,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, StoreError> {
        match self.tasks.get_mut(id) {
            Some(mut task) if task.user_id == *owner => {
                if let Some(title) = &changes.title {
                    task.title = title.clone();
                }
                if let Some(description) = &changes.description {
                    task.description = description.clone();
                }
                if let Some(status) = changes.status {
                    task.status = status;
                }
                if let Some(due_date) = changes.due_date {
                    task.due_date = due_date;
                }
                task.updated_at = Utc::now();
                Ok(Some(task.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, owner: &ObjectId, id: &ObjectId) -> Result<bool, StoreError> {
        Ok(self
            .tasks
            .remove_if(id, |_, task| task.user_id == *owner)
            .is_some())
    }
}
