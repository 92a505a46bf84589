use crate::models::{Post, User};
use chrono::DateTime;

/// Number of posts rendered per list page.
pub const PAGE_SIZE: i64 = 5;

/// One page of the post list plus the cursor for the next page.
#[derive(Debug)]
pub struct PostPage {
    pub posts: Vec<Post>,
    /// Hex id of the last post, present only when the page was full.
    pub next_cursor: Option<String>,
}

impl PostPage {
    pub fn new(posts: Vec<Post>) -> Self {
        let next_cursor = if posts.len() as i64 >= PAGE_SIZE {
            posts.last().map(|post| post.id.to_hex())
        } else {
            None
        };

        Self { posts, next_cursor }
    }
}

/// Public profile fields; never carries the password hash.
#[derive(Debug)]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub nickname: String,
    pub joined: String,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        let joined = DateTime::from_timestamp(user.created_at, 0)
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        Self {
            id: user.id.to_hex(),
            email: user.email,
            username: user.username,
            nickname: user.nickname,
            joined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    fn post(title: &str) -> Post {
        Post {
            id: ObjectId::new(),
            title: title.into(),
            content: "content".into(),
            img: None,
            author_id: None,
            created_at: 0,
        }
    }

    #[test]
    fn full_page_exposes_cursor_of_last_post() {
        let posts: Vec<Post> = (0..PAGE_SIZE).map(|i| post(&i.to_string())).collect();
        let last = posts.last().unwrap().id.to_hex();
        assert_eq!(PostPage::new(posts).next_cursor, Some(last));
    }

    #[test]
    fn short_page_has_no_cursor() {
        assert!(PostPage::new(vec![post("only")]).next_cursor.is_none());
    }
}
