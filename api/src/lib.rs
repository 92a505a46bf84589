//! Forum server: registration and login, paginated posts with optional
//! images, and profile pages, rendered on the server.

pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod errors;
pub mod models;
pub mod routes;
pub mod session;
pub mod states;
pub mod upload;
pub mod views;

pub use config::Config;
pub use errors::ApiError;
pub use routes::router as build_router;
pub use states::AppState;
