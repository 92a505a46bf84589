use crate::{auth::CurrentUser, views};
use axum::response::Html;

/// GET /
pub async fn home(CurrentUser(user): CurrentUser) -> Html<String> {
    views::home(user.as_ref())
}
