use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::ApiError;
use crate::config::ShortCodeConfig;
use crate::models::{CreateUrlRequest, UrlInfo};
use crate::shortener;
use crate::storage::Storage;

pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub short_codes: ShortCodeConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Create a shortened URL.
/// Responds 201 for a new record and 200 when an existing one is reused.
pub async fn create_url(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UrlInfo>), ApiError> {
    let Json(payload) = payload?;

    let assignment = shortener::assign_code(
        state.storage.as_ref(),
        &state.short_codes,
        &payload.target_url,
        payload.custom_url.as_deref(),
    )
    .await?;

    let status = if assignment.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(UrlInfo::from(assignment.record))))
}

/// Look up the original URL for a short code
pub async fn resolve_url(
    State(state): State<Arc<AppState>>,
    Path(short_url): Path<String>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let url = shortener::resolve(state.storage.as_ref(), &short_url).await?;
    Ok(Json(ResolveResponse { url }))
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
    })
}
