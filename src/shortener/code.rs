use sha2::{Digest, Sha256};
use tracing::debug;

/// Derive a short code from the exact bytes of `url`: the lowercase hex
/// SHA-256 digest truncated to `length` characters (at most 64).
pub fn derive_code(url: &str, length: usize) -> String {
    let mut hex = format!("{:x}", Sha256::digest(url.as_bytes()));
    hex.truncate(length);

    debug!(short_code = %hex, url = %url, "Generated short URL");
    hex
}
