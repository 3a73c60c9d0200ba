use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShortenerError {
    #[error("invalid target URL: {0}")]
    InvalidTargetUrl(String),
    #[error("invalid custom short code: {0}")]
    InvalidCustomFormat(String),
    #[error("custom short code '{0}' is already taken")]
    CodeTaken(String),
    /// A derived code collided with an unrelated record
    #[error("derived short code '{0}' collides with an existing record")]
    Conflict(String),
    #[error("short code '{0}' not found")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type ShortenerResult<T> = Result<T, ShortenerError>;
