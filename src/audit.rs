use crate::error::{MigrationError, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDigest {
    pub path: PathBuf,
    pub bytes: u64,
    pub sha256: String,
}

pub fn file_sha256(path: &Path) -> Result<InputDigest> {
    let bytes = std::fs::read(path).map_err(|source| MigrationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(InputDigest {
        path: path.to_path_buf(),
        bytes: bytes.len() as u64,
        sha256: format!("{:x}", hasher.finalize()),
    })
}

/// Logs size and checksum of every export this run reads. Fails on the first
/// unreadable input, before anything is written.
pub fn log_input_digests(paths: &[&Path]) -> Result<Vec<InputDigest>> {
    paths.iter().copied().map(log_input_digest).collect()
}

pub fn log_input_digest(path: &Path) -> Result<InputDigest> {
    let d = file_sha256(path)?;
    info!("input {} ({} bytes) sha256 {}", d.path.display(), d.bytes, d.sha256);
    Ok(d)
}
