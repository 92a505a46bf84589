use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A registered account as stored in the `user` collection.
///
/// Field names on disk follow the collection's existing documents
/// (`useremail`, `password`), so the Rust names are mapped with `rename`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "useremail", default)]
    pub email: String,
    #[serde(rename = "password")]
    pub hashed_password: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub created_at: i64,
}

/// The user record handed to handlers for a live session, password stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: ObjectId,
    pub email: String,
    pub username: String,
    pub nickname: String,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            nickname: user.nickname,
        }
    }
}
