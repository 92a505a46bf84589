use crate::{AppState, auth::CurrentUser, dto::ProfileResponse, errors::ApiError, views};
use axum::{
    extract::{Path, State},
    response::Html,
};

use super::parse_id;

/// GET /profile/{user_id}
pub async fn profile(
    State(state): State<AppState>,
    CurrentUser(viewer): CurrentUser,
    Path(user_id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let id = parse_id(&user_id)?;
    let user = state.users.find_by_id(id).await?.ok_or(ApiError::NotFound)?;

    Ok(views::profile(&ProfileResponse::from(user), viewer.as_ref()))
}
