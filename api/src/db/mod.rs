//! Document store access for the `post` and `user` collections.
//!
//! Handlers only see the [`PostStore`] and [`UserStore`] traits. [`MongoStore`]
//! is what the server runs against; [`MemoryStore`] keeps the same contract in
//! process and backs the test suite.

mod memory;
mod mongo;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::models::{Post, User};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Up to `limit` posts in ascending `_id` order, starting after `after`.
    async fn list_after(&self, after: Option<ObjectId>, limit: i64) -> StoreResult<Vec<Post>>;

    async fn find(&self, id: ObjectId) -> StoreResult<Option<Post>>;

    async fn insert(&self, post: &Post) -> StoreResult<()>;

    /// Returns whether a post with `id` matched, even when the stored title and
    /// content already equal the new values.
    async fn update(&self, id: ObjectId, title: &str, content: &str) -> StoreResult<bool>;

    /// Returns whether a post was removed.
    async fn delete(&self, id: ObjectId) -> StoreResult<bool>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_by_nickname(&self, nickname: &str) -> StoreResult<Option<User>>;

    /// Plain insert. Uniqueness is checked by the caller beforehand, so two
    /// concurrent registrations with the same email can both succeed.
    async fn insert(&self, user: &User) -> StoreResult<()>;
}
