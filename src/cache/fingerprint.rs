//! Content fingerprinting for dependency-declaration files
//!
//! A fingerprint is the lowercase hex SHA256 of a file's full byte stream.
//! It is used for change detection only.

use crate::error::{StepError, StepResult};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::Path;

/// Length of a fingerprint in hex characters
pub const FINGERPRINT_LEN: usize = 64;

/// Hash a file's contents, streaming it through the hasher
///
/// The file is closed when this returns, on success and on every error path.
pub fn fingerprint_file(path: &Path) -> StepResult<String> {
    let mut file = File::open(path).map_err(|e| StepError::Fingerprint {
        path: path.to_path_buf(),
        source: e,
    })?;

    fingerprint_reader(&mut file).map_err(|e| StepError::Fingerprint {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Hash everything readable from `reader`
pub fn fingerprint_reader<R: io::Read>(reader: &mut R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    io::copy(reader, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Hash an in-memory byte slice
pub fn fingerprint_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
