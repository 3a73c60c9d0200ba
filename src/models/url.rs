use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored short code mapping. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ShortenedUrl {
    pub short_code: String,
    pub original_url: String,
    pub is_custom: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    pub target_url: String,
    #[serde(default)]
    pub custom_url: Option<String>,
}

/// Response body for `POST /url`
#[derive(Debug, Serialize, Deserialize)]
pub struct UrlInfo {
    pub short_url: String,
    pub target_url: String,
    pub is_custom: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ShortenedUrl> for UrlInfo {
    fn from(url: ShortenedUrl) -> Self {
        Self {
            short_url: url.short_code,
            target_url: url.original_url,
            is_custom: url.is_custom,
            created_at: url.created_at,
        }
    }
}
