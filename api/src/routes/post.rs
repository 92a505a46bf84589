use crate::{
    AppState,
    auth::CurrentUser,
    dto::{CreatePostRequest, DeletePostRequest, EditPostRequest, PAGE_SIZE, PostPage},
    errors::ApiError,
    models::Post,
    upload::{DEFAULT_CONTENT_TYPE, UploadedFile, object_key},
    views,
};
use axum::{
    Form, Json,
    extract::{Multipart, Path, State, multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, Redirect},
};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use tracing::info;
use validator::Validate;

use super::parse_id;

fn bad_upload(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge;
    }
    ApiError::ValidationError(format!("Invalid upload: {}", err))
}

/// GET /posts/list
pub async fn list_posts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Html<String>, ApiError> {
    let posts = state.posts.list_after(None, PAGE_SIZE).await?;

    Ok(views::list(&PostPage::new(posts), user.as_ref()))
}

/// GET /posts/list/{id}
/// Next page: posts created after `id`
pub async fn list_posts_after(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let cursor = parse_id(&id)?;
    let posts = state.posts.list_after(Some(cursor), PAGE_SIZE).await?;

    Ok(views::list(&PostPage::new(posts), user.as_ref()))
}

/// GET /posts/write
pub async fn write_form(CurrentUser(user): CurrentUser) -> Html<String> {
    views::write(user.as_ref())
}

/// POST /posts/add
/// Multipart: title, content, optional file img1
pub async fn add_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<Redirect, ApiError> {
    let mut payload = CreatePostRequest::default();
    let mut image: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_upload)? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "title" => payload.title = field.text().await.map_err(bad_upload)?,
            "content" => payload.content = field.text().await.map_err(bad_upload)?,
            "img1" => {
                let file_name = field.file_name().map(str::to_owned);
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_owned();
                let bytes = field.bytes().await.map_err(bad_upload)?;

                // browsers send an empty part when no file was chosen
                if !bytes.is_empty() {
                    image = Some(UploadedFile {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    payload.validate()?;

    let img = match image {
        Some(file) => {
            let key = object_key();
            info!(
                "Uploading {} ({} bytes) as {}",
                file.file_name.as_deref().unwrap_or("unnamed file"),
                file.bytes.len(),
                key
            );
            Some(state.uploads.put(&key, file).await?)
        }
        None => None,
    };

    let post = Post {
        id: ObjectId::new(),
        title: payload.title,
        content: payload.content,
        img,
        author_id: user.map(|user| user.id),
        created_at: Utc::now().timestamp(),
    };

    state.posts.insert(&post).await?;

    info!("Post created: {}", post.id);

    Ok(Redirect::to("/posts/list"))
}

/// GET /posts/detail/{id}
pub async fn detail_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let id = parse_id(&id)?;
    let post = state.posts.find(id).await?.ok_or(ApiError::NotFound)?;

    let author = match post.author_id {
        Some(author_id) => state
            .users
            .find_by_id(author_id)
            .await?
            .map(|author| author.nickname),
        None => None,
    };

    Ok(views::detail(&post, author.as_deref(), user.as_ref()))
}

/// GET /posts/edit/{id}
pub async fn edit_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let id = parse_id(&id)?;
    let post = state.posts.find(id).await?.ok_or(ApiError::NotFound)?;

    Ok(views::edit(&post, user.as_ref()))
}

/// POST /posts/edit/{id}
/// Form: title, content
pub async fn edit_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(payload): Form<EditPostRequest>,
) -> Result<Redirect, ApiError> {
    payload.validate()?;

    let id = parse_id(&id)?;
    let found = state
        .posts
        .update(id, &payload.title, &payload.content)
        .await?;

    if !found {
        return Err(ApiError::NotFound);
    }

    info!("Post updated: {}", id);

    Ok(Redirect::to(&format!("/posts/detail/{}", id.to_hex())))
}

/// DELETE /posts/delete
/// Body: { "_id": "..." }
pub async fn delete_post(
    State(state): State<AppState>,
    payload: Result<Json<DeletePostRequest>, JsonRejection>,
) -> Result<Redirect, ApiError> {
    let raw_id = payload
        .ok()
        .and_then(|Json(body)| body.id)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::ValidationError("_id is required".into()))?;

    let id = parse_id(&raw_id)?;

    if !state.posts.delete(id).await? {
        return Err(ApiError::NotFound);
    }

    info!("Post deleted: {}", id);

    Ok(Redirect::to("/posts/list"))
}
