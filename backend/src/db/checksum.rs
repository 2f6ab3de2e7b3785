//! Content fingerprints for loaded datasets.

use sha2::{Digest, Sha256};

/// Calculate the SHA-256 checksum of a dataset's raw content.
///
/// # Returns
/// Hexadecimal string representation of the hash.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Shortened fingerprint suitable for logs and health responses.
pub fn short_fingerprint(checksum: &str) -> &str {
    checksum.get(..12).unwrap_or(checksum)
}
