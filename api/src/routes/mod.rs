pub mod health;
pub mod home;
pub mod post;
pub mod profile;
pub mod user;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use mongodb::bson::oid::ObjectId;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{AppState, errors::ApiError};

pub use health::health_check;
pub use home::home;
pub use post::{
    add_post, delete_post, detail_post, edit_form, edit_post, list_posts, list_posts_after,
    write_form,
};
pub use profile::profile;
pub use user::{login, login_form, logout, register, register_form};

pub(crate) fn parse_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::invalid_id(raw))
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_posts))
        .route("/list/{id}", get(list_posts_after))
        .route("/write", get(write_form))
        .route("/add", post(add_post))
        .route("/detail/{id}", get(detail_post))
        .route("/edit/{id}", get(edit_form).post(edit_post))
        .route("/delete", delete(delete_post))
}

/// Builds the full application: pages, post routes, static files and middleware.
pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/login", get(login_form).post(login))
        .route("/logout", post(logout))
        .route("/register", get(register_form).post(register))
        .route("/profile/{user_id}", get(profile))
        .nest("/posts", post_routes())
        .fallback_service(ServeDir::new(&config.public_dir))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(GlobalConcurrencyLimitLayer::new(config.max_concurrent_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
