use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::shortener::ShortenerError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Errors leaving an HTTP handler. Every variant renders as `{ "detail": ... }`.
#[derive(Debug)]
pub enum ApiError {
    Shortener(ShortenerError),
    /// Request body missing, not JSON, or the wrong shape
    InvalidBody { status: StatusCode, detail: String },
}

impl From<ShortenerError> for ApiError {
    fn from(err: ShortenerError) -> Self {
        ApiError::Shortener(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl ApiError {
    fn status_and_detail(self) -> (StatusCode, String) {
        match self {
            ApiError::InvalidBody { status, detail } => (status, detail),
            ApiError::Shortener(err) => match err {
                ShortenerError::InvalidTargetUrl(reason) => (StatusCode::BAD_REQUEST, reason),
                ShortenerError::InvalidCustomFormat(reason) => (
                    StatusCode::BAD_REQUEST,
                    format!("Invalid custom URL. {reason}"),
                ),
                ShortenerError::CodeTaken(_) => (
                    StatusCode::BAD_REQUEST,
                    "Custom URL is already taken".to_string(),
                ),
                ShortenerError::Conflict(_) => (
                    StatusCode::CONFLICT,
                    "Generated short URL collides with an existing entry".to_string(),
                ),
                ShortenerError::NotFound(_) => {
                    (StatusCode::NOT_FOUND, "URL not found".to_string())
                }
                ShortenerError::Storage(e) => {
                    tracing::error!(error = %e, "Storage failure while handling request");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();
        (status, Json(ErrorResponse { detail })).into_response()
    }
}
