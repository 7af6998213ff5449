//! MongoDB repository implementations.
//!
//! Writes rely on the store's atomic single-document operations; partial
//! task updates go through one `find_one_and_update` with an owner-scoped
//! filter so ownership is verified and the change applied in a single step.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{DateTime as BsonDateTime, doc};
use mongodb::options::ReturnDocument;

use super::{DocumentStore, StoreError, TaskRepository, UserRepository};
use crate::models::{Task, TaskChanges, User};

/// User repository backed by the `users` collection.
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(store: &DocumentStore) -> Self {
        Self {
            collection: store.users(),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, StoreError> {
        Ok(self.collection.find_one(doc! {"_id": *id}).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.collection.find_one(doc! {"email": email}).await?)
    }

    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self
            .collection
            .find_one(doc! {"username": username})
            .await?
            .is_some())
    }

    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        self.collection.insert_one(user).await?;
        Ok(())
    }

    async fn set_password_hash(&self, id: &ObjectId, hash: &str) -> Result<bool, StoreError> {
        let result = self
            .collection
            .update_one(
                doc! {"_id": *id},
                doc! {"$set": {"password": hash, "updated_at": BsonDateTime::now()}},
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn update_username(
        &self,
        id: &ObjectId,
        username: &str,
    ) -> Result<Option<User>, StoreError> {
        Ok(self
            .collection
            .find_one_and_update(
                doc! {"_id": *id},
                doc! {"$set": {"username": username, "updated_at": BsonDateTime::now()}},
            )
            .return_document(ReturnDocument::After)
            .await?)
    }
}

/// Task repository backed by the `tasks` collection.
#[derive(Clone)]
pub struct MongoTaskRepository {
    collection: Collection<Task>,
}

impl MongoTaskRepository {
    pub fn new(store: &DocumentStore) -> Self {
        Self {
            collection: store.tasks(),
        }
    }
}

#[async_trait]
impl TaskRepository for MongoTaskRepository {
    async fn find_by_owner(&self, owner: &ObjectId) -> Result<Vec<Task>, StoreError> {
        let cursor = self
            .collection
            .find(doc! {"user_id": *owner})
            .sort(doc! {"created_at": 1})
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_id(
        &self,
        owner: &ObjectId,
        id: &ObjectId,
    ) -> Result<Option<Task>, StoreError> {
        Ok(self
            .collection
            .find_one(doc! {"_id": *id, "user_id": *owner})
            .await?)
    }

    async fn insert(&self, task: &Task) -> Result<(), StoreError> {
        self.collection.insert_one(task).await?;
        Ok(())
    }

    async fn update(
        &self,
        owner: &ObjectId,
        id: &ObjectId,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, StoreError> {
        let mut set = doc! {"updated_at": BsonDateTime::now()};
        if let Some(title) = &changes.title {
            set.insert("title", title);
        }
        if let Some(description) = &changes.description {
            set.insert("description", description);
        }
        if let Some(status) = changes.status {
            set.insert("status", status.as_str());
        }
        if let Some(due_date) = changes.due_date {
            set.insert("due_date", BsonDateTime::from_chrono(due_date));
        }

        Ok(self
            .collection
            .find_one_and_update(doc! {"_id": *id, "user_id": *owner}, doc! {"$set": set})
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn delete(&self, owner: &ObjectId, id: &ObjectId) -> Result<bool, StoreError> {
        let result = self
            .collection
            .delete_one(doc! {"_id": *id, "user_id": *owner})
            .await?;
        Ok(result.deleted_count > 0)
    }
}
