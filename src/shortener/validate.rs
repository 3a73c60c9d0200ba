use tracing::warn;
use url::Url;

use super::error::{ShortenerError, ShortenerResult};
use crate::config::ShortCodeConfig;

/// Upper bound on accepted target URLs, in characters.
pub const MAX_TARGET_URL_LENGTH: usize = 2083;

/// Accept only absolute `http`/`https` URLs with a host.
pub fn validate_target_url(raw: &str) -> ShortenerResult<()> {
    if raw.chars().count() > MAX_TARGET_URL_LENGTH {
        warn!(length = raw.len(), "Target URL too long");
        return Err(ShortenerError::InvalidTargetUrl(format!(
            "URL must be at most {MAX_TARGET_URL_LENGTH} characters"
        )));
    }

    // Url::parse strips these silently; the stored string must be the parsed one
    if raw
        .chars()
        .any(|c| c.is_ascii_control() || c.is_ascii_whitespace())
    {
        warn!(url = ?raw, "Target URL contains whitespace or control characters");
        return Err(ShortenerError::InvalidTargetUrl(
            "URL must not contain whitespace or control characters".to_string(),
        ));
    }

    let parsed = Url::parse(raw).map_err(|e| {
        warn!(url = %raw, error = %e, "Target URL does not parse");
        ShortenerError::InvalidTargetUrl("Invalid URL format".to_string())
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        warn!(url = %raw, scheme = parsed.scheme(), "Target URL has unsupported scheme");
        return Err(ShortenerError::InvalidTargetUrl(
            "URL scheme must be http or https".to_string(),
        ));
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        warn!(url = %raw, "Target URL has no host");
        return Err(ShortenerError::InvalidTargetUrl(
            "URL must include a host".to_string(),
        ));
    }

    Ok(())
}

/// Alphanumeric at both ends, alphanumeric or `-` in between.
fn has_valid_shape(code: &str) -> bool {
    let bytes = code.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) if bytes.len() >= 2 => {
            first.is_ascii_alphanumeric()
                && last.is_ascii_alphanumeric()
                && bytes
                    .iter()
                    .all(|b| b.is_ascii_alphanumeric() || *b == b'-')
        }
        _ => false,
    }
}

/// Check a client-supplied short code against the format, length and
/// reserved-word rules.
pub fn validate_custom_code(code: &str, rules: &ShortCodeConfig) -> bool {
    if !has_valid_shape(code) {
        warn!(code = %code, "Invalid custom URL format");
        return false;
    }

    // shape check guarantees ASCII, so byte length is character length
    if code.len() < rules.min_custom_length || code.len() > rules.max_custom_length {
        warn!(code = %code, "Custom URL length out of bounds");
        return false;
    }

    if rules.reserved_words.contains(&code.to_lowercase()) {
        warn!(code = %code, "Attempted to use reserved word as custom URL");
        return false;
    }

    true
}
