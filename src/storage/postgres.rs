use crate::models::ShortenedUrl;
use crate::storage::{Storage, StorageError, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

pub struct PostgresStorage {
    pool: Arc<PgPool>,
}

impl PostgresStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS urls (
                short_code TEXT PRIMARY KEY,
                original_url TEXT NOT NULL,
                is_custom BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_original_url ON urls(original_url)")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<ShortenedUrl>> {
        let url = sqlx::query_as::<_, ShortenedUrl>(
            r#"
            SELECT short_code, original_url, is_custom, created_at
            FROM urls
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(url)
    }

    async fn find_by_url(&self, original_url: &str) -> Result<Option<ShortenedUrl>> {
        let url = sqlx::query_as::<_, ShortenedUrl>(
            r#"
            SELECT short_code, original_url, is_custom, created_at
            FROM urls
            WHERE original_url = $1
            ORDER BY is_custom ASC, created_at ASC
            LIMIT 1
            "#,
        )
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(url)
    }

    async fn insert(
        &self,
        short_code: &str,
        original_url: &str,
        is_custom: bool,
    ) -> StorageResult<ShortenedUrl> {
        let created_at = Utc::now();

        let inserted = sqlx::query_as::<_, ShortenedUrl>(
            r#"
            INSERT INTO urls (short_code, original_url, is_custom, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (short_code) DO NOTHING
            RETURNING short_code, original_url, is_custom, created_at
            "#,
        )
        .bind(short_code)
        .bind(original_url)
        .bind(is_custom)
        .bind(created_at)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| StorageError::Other(e.into()))?;

        inserted.ok_or(StorageError::Conflict)
    }
}
