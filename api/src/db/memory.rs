use async_trait::async_trait;
use dashmap::DashMap;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use super::{PostStore, StoreResult, UserStore};
use crate::models::{Post, User};

/// In-process store with the same semantics as the MongoDB collections.
#[derive(Clone, Default)]
pub struct MemoryStore {
    posts: Arc<DashMap<ObjectId, Post>>,
    users: Arc<DashMap<ObjectId, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn find_user_by<F>(&self, predicate: F) -> Option<User>
    where
        F: Fn(&User) -> bool,
    {
        self.users
            .iter()
            .find(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list_after(&self, after: Option<ObjectId>, limit: i64) -> StoreResult<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|entry| after.is_none_or(|cursor| *entry.key() > cursor))
            .map(|entry| entry.value().clone())
            .collect();

        posts.sort_by(|a, b| a.id.cmp(&b.id));
        posts.truncate(limit.max(0) as usize);

        Ok(posts)
    }

    async fn find(&self, id: ObjectId) -> StoreResult<Option<Post>> {
        Ok(self.posts.get(&id).map(|post| post.clone()))
    }

    async fn insert(&self, post: &Post) -> StoreResult<()> {
        self.posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn update(&self, id: ObjectId, title: &str, content: &str) -> StoreResult<bool> {
        match self.posts.get_mut(&id) {
            Some(mut post) => {
                post.title = title.to_string();
                post.content = content.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: ObjectId) -> StoreResult<bool> {
        Ok(self.posts.remove(&id).is_some())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<User>> {
        Ok(self.users.get(&id).map(|user| user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.find_user_by(|user| user.email == email))
    }

    async fn find_by_nickname(&self, nickname: &str) -> StoreResult<Option<User>> {
        Ok(self.find_user_by(|user| user.nickname == nickname))
    }

    async fn insert(&self, user: &User) -> StoreResult<()> {
        self.users.insert(user.id, user.clone());
        Ok(())
    }
}
