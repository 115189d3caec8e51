//! Checksum validation for migrations
//!
//! A migration's SHA256 checksum is recorded when it is applied and compared
//! on every later run, so edits to already-applied SQL are caught.

use sha2::{Digest, Sha256};

/// Compute SHA256 checksum of migration SQL
pub fn compute_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
