use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Client, Collection, Database,
    bson::{doc, oid::ObjectId},
};
use tracing::info;

use super::{PostStore, StoreResult, UserStore};
use crate::models::{Post, User};

const POST_COLLECTION: &str = "post";
const USER_COLLECTION: &str = "user";

#[derive(Clone)]
pub struct MongoStore {
    posts: Collection<Post>,
    users: Collection<User>,
}

impl MongoStore {
    /// Connect and ping, so a bad `DB_URL` fails at startup rather than on the first request.
    pub async fn connect(url: &str, db_name: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(url).await?;
        let db = client.database(db_name);
        db.run_command(doc! { "ping": 1 }).await?;

        info!("Connected to MongoDB database {}", db_name);

        Ok(Self::new(&db))
    }

    pub fn new(db: &Database) -> Self {
        Self {
            posts: db.collection(POST_COLLECTION),
            users: db.collection(USER_COLLECTION),
        }
    }
}

#[async_trait]
impl PostStore for MongoStore {
    async fn list_after(&self, after: Option<ObjectId>, limit: i64) -> StoreResult<Vec<Post>> {
        let filter = match after {
            Some(id) => doc! { "_id": { "$gt": id } },
            None => doc! {},
        };

        let cursor = self
            .posts
            .find(filter)
            .sort(doc! { "_id": 1 })
            .limit(limit)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn find(&self, id: ObjectId) -> StoreResult<Option<Post>> {
        Ok(self.posts.find_one(doc! { "_id": id }).await?)
    }

    async fn insert(&self, post: &Post) -> StoreResult<()> {
        self.posts.insert_one(post).await?;
        Ok(())
    }

    async fn update(&self, id: ObjectId, title: &str, content: &str) -> StoreResult<bool> {
        let result = self
            .posts
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "title": title, "content": content } },
            )
            .await?;

        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: ObjectId) -> StoreResult<bool> {
        let result = self.posts.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}

#[async_trait]
impl UserStore for MongoStore {
    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<User>> {
        Ok(self.users.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.users.find_one(doc! { "useremail": email }).await?)
    }

    async fn find_by_nickname(&self, nickname: &str) -> StoreResult<Option<User>> {
        Ok(self.users.find_one(doc! { "nickname": nickname }).await?)
    }

    async fn insert(&self, user: &User) -> StoreResult<()> {
        self.users.insert_one(user).await?;
        Ok(())
    }
}
