//! Short code assignment and lookup on top of a [`Storage`] backend.

pub mod code;
pub mod error;
pub mod validate;

pub use code::derive_code;
pub use error::{ShortenerError, ShortenerResult};
pub use validate::{validate_custom_code, validate_target_url};

use tracing::{info, warn};

use crate::config::ShortCodeConfig;
use crate::models::ShortenedUrl;
use crate::storage::{Storage, StorageError};

/// Outcome of [`assign_code`].
#[derive(Debug, Clone)]
pub struct Assignment {
    pub record: ShortenedUrl,
    /// `false` when an existing non-custom record for the same URL was reused
    pub created: bool,
}

impl Assignment {
    fn created(record: ShortenedUrl) -> Self {
        Self {
            record,
            created: true,
        }
    }

    fn reused(record: ShortenedUrl) -> Self {
        Self {
            record,
            created: false,
        }
    }
}

/// Validate `target_url` and give it a short code.
///
/// With a custom code the code is validated and must be free. Without one,
/// a code is derived from the URL and an existing non-custom record for the
/// same URL is returned instead of writing a new one. An empty custom code is
/// treated as absent.
pub async fn assign_code(
    store: &dyn Storage,
    rules: &ShortCodeConfig,
    target_url: &str,
    custom_code: Option<&str>,
) -> ShortenerResult<Assignment> {
    validate_target_url(target_url)?;

    match custom_code.filter(|c| !c.is_empty()) {
        Some(custom) => assign_custom(store, rules, target_url, custom).await,
        None => assign_derived(store, rules, target_url).await,
    }
}

async fn assign_custom(
    store: &dyn Storage,
    rules: &ShortCodeConfig,
    target_url: &str,
    custom: &str,
) -> ShortenerResult<Assignment> {
    if !validate_custom_code(custom, rules) {
        return Err(ShortenerError::InvalidCustomFormat(format!(
            "Use {}-{} alphanumeric characters and hyphens. Cannot start or end with hyphen.",
            rules.min_custom_length, rules.max_custom_length
        )));
    }

    if store.find_by_code(custom).await?.is_some() {
        warn!(short_code = %custom, "Custom URL already taken");
        return Err(ShortenerError::CodeTaken(custom.to_string()));
    }

    info!(short_code = %custom, "Creating custom URL");
    match store.insert(custom, target_url, true).await {
        Ok(record) => {
            info!(short_code = %record.short_code, url = %target_url, "Created new URL record");
            Ok(Assignment::created(record))
        }
        Err(StorageError::Conflict) => {
            warn!(short_code = %custom, "Custom URL taken by a concurrent request");
            Err(ShortenerError::CodeTaken(custom.to_string()))
        }
        Err(StorageError::Other(e)) => Err(ShortenerError::Storage(e)),
    }
}

async fn assign_derived(
    store: &dyn Storage,
    rules: &ShortCodeConfig,
    target_url: &str,
) -> ShortenerResult<Assignment> {
    let short_code = derive_code(target_url, rules.auto_length);

    if let Some(existing) = store.find_by_url(target_url).await? {
        if !existing.is_custom {
            info!(short_code = %existing.short_code, url = %target_url, "Returning existing URL");
            return Ok(Assignment::reused(existing));
        }
    }

    match store.insert(&short_code, target_url, false).await {
        Ok(record) => {
            info!(short_code = %record.short_code, url = %target_url, "Created new URL record");
            Ok(Assignment::created(record))
        }
        Err(StorageError::Conflict) => {
            // Either a concurrent identical submission won the insert, or the
            // truncated digest matches an unrelated record.
            match store.find_by_code(&short_code).await? {
                Some(existing) if !existing.is_custom && existing.original_url == target_url => {
                    info!(short_code = %short_code, url = %target_url, "Returning concurrently created URL");
                    Ok(Assignment::reused(existing))
                }
                _ => {
                    warn!(short_code = %short_code, url = %target_url, "Derived short URL collides with an existing record");
                    Err(ShortenerError::Conflict(short_code))
                }
            }
        }
        Err(StorageError::Other(e)) => Err(ShortenerError::Storage(e)),
    }
}

/// Exact, case-sensitive lookup of the original URL behind `short_code`.
pub async fn resolve(store: &dyn Storage, short_code: &str) -> ShortenerResult<String> {
    match store.find_by_code(short_code).await? {
        Some(record) => {
            tracing::debug!(short_code = %short_code, "Retrieved URL for short code");
            Ok(record.original_url)
        }
        None => {
            warn!(short_code = %short_code, "No URL found for short code");
            Err(ShortenerError::NotFound(short_code.to_string()))
        }
    }
}
