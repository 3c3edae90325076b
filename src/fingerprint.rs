//! Content fingerprinting
//!
//! SHA-256 over the full byte stream, rendered as lowercase hex. The digest
//! is what the ledger stores per applied file and what tamper detection
//! compares against on every subsequent run.

use crate::error::MigrateError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Length of a rendered fingerprint: 32 SHA-256 bytes as hex.
pub const FINGERPRINT_LEN: usize = 64;

/// Hash a byte slice. Pure and deterministic.
pub fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Read a file and hash its contents, returning the digest and the content.
///
/// The content is returned alongside the digest so callers execute exactly
/// the bytes that were hashed, with no second read in between. An unreadable
/// file is a hard error.
pub fn fingerprint_file(path: &Path) -> Result<(String, String), MigrateError> {
    let sql = std::fs::read_to_string(path).map_err(|e| MigrateError::Fingerprint {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok((fingerprint(sql.as_bytes()), sql))
}
