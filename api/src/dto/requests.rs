use serde::Deserialize;
use validator::Validate;

/// Form fields default to empty so a missing field reports as a validation
/// error instead of a form rejection.
#[derive(Debug, Validate, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Invalid email format")
    )]
    pub useremail: String,
    #[serde(default)]
    #[validate(length(min = 4, max = 100, message = "Password must be 4-100 characters"))]
    pub password: String,
    #[serde(default)]
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 20, message = "Username must be 1-20 characters"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 20, message = "Nickname must be 1-20 characters"))]
    pub nickname: String,
}

#[derive(Debug, Validate, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub useremail: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Assembled from the multipart body of `POST /posts/add`.
#[derive(Debug, Default, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 5000, message = "Content must be 1-5000 characters"))]
    pub content: String,
}

#[derive(Debug, Validate, Deserialize)]
pub struct EditPostRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 5000, message = "Content must be 1-5000 characters"))]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct DeletePostRequest {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            useremail: "kim@example.com".into(),
            password: password.into(),
            confirm_password: confirm.into(),
            username: "kim".into(),
            nickname: "kimchi".into(),
        }
    }

    #[test]
    fn register_accepts_four_character_password() {
        assert!(register("abcd", "abcd").validate().is_ok());
    }

    #[test]
    fn register_rejects_short_password() {
        let errors = register("abc", "abc").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn register_rejects_mismatched_confirmation() {
        let errors = register("abcd", "abce").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("confirm_password"));
    }

    #[test]
    fn register_rejects_missing_fields() {
        let request: RegisterRequest = serde_json::from_str(r#"{"useremail":"a@b.io"}"#).unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("nickname"));
    }

    #[test]
    fn create_post_rejects_empty_title() {
        let request = CreatePostRequest {
            title: String::new(),
            content: "body".into(),
        };
        assert!(request.validate().is_err());
    }
}
