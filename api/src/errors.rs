use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::{db::StoreError, upload::UploadError};

#[derive(Debug)]
pub enum ApiError {
    InvalidCredentials,
    UserAlreadyExists(String),
    Unauthorized,
    NotFound,
    ValidationError(String),
    TooManyRequests,
    PayloadTooLarge,
    UploadFailed(String),
    InternalError(String),
}

impl ApiError {
    pub fn invalid_id(raw: &str) -> Self {
        ApiError::ValidationError(format!("Invalid id: {}", raw))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        ApiError::UploadFailed(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(err.to_string())
    }
}

/// Axum calls this to turn a handler's `Err` into the response the browser sees.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            ApiError::UserAlreadyExists(msg) => {
                return (
                    StatusCode::CONFLICT,
                    Json(serde_json::json!({
                      "error": msg
                    })),
                )
                    .into_response();
            }
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not Found"),
            ApiError::ValidationError(msg) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({
                      "error": msg
                    })),
                )
                    .into_response();
            }
            ApiError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many login attempts, try again later",
            ),
            ApiError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "Upload is too large"),
            ApiError::UploadFailed(msg) => {
                error!("Upload failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "upload error")
            }
            ApiError::InternalError(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (
            status,
            Json(serde_json::json!({
              "error": message
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        let cases = [
            (ApiError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (ApiError::UserAlreadyExists("taken".into()), StatusCode::CONFLICT),
            (ApiError::NotFound, StatusCode::NOT_FOUND),
            (ApiError::invalid_id("zz"), StatusCode::BAD_REQUEST),
            (ApiError::TooManyRequests, StatusCode::TOO_MANY_REQUESTS),
            (ApiError::PayloadTooLarge, StatusCode::PAYLOAD_TOO_LARGE),
            (
                ApiError::UploadFailed("bucket gone".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::InternalError("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
