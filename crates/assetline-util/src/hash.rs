/// Length of a full BLAKE3 hex digest.
pub const FULL_DIGEST_LEN: usize = 64;

/// BLAKE3 digest of a byte slice, hex encoded.
#[must_use]
pub fn content_digest(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Truncate a hex digest to `len` characters, clamped to `1..=64`.
#[must_use]
pub fn short_digest(digest: &str, len: usize) -> &str {
    let len = len.clamp(1, FULL_DIGEST_LEN).min(digest.len());
    &digest[..len]
}
