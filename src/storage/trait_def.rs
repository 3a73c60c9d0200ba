use crate::models::ShortenedUrl;
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("short code already exists")]
    Conflict,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize the storage (create tables and indexes)
    async fn init(&self) -> Result<()>;

    /// Get a shortened URL by its exact short code
    async fn find_by_code(&self, short_code: &str) -> Result<Option<ShortenedUrl>>;

    /// Get a record pointing at `original_url`.
    /// Non-custom records are preferred over custom ones, oldest first.
    async fn find_by_url(&self, original_url: &str) -> Result<Option<ShortenedUrl>>;

    /// Insert a new record, stamping `created_at` with the current time.
    /// Fails atomically with `StorageError::Conflict` if the short code is taken.
    async fn insert(
        &self,
        short_code: &str,
        original_url: &str,
        is_custom: bool,
    ) -> StorageResult<ShortenedUrl>;
}
