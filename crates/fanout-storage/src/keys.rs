//! Shared key and path building for both destinations.
//!
//! Remote key format: `{service_id}/{filename}`. Local path: `{root}/{service_id}/{filename}`.

use std::path::{Path, PathBuf};

use crate::traits::{StorageError, StorageResult};

fn validate_segment(kind: &str, value: &str) -> StorageResult<()> {
    if value.is_empty() {
        return Err(StorageError::InvalidKey(format!("{} is empty", kind)));
    }
    if value.contains("..") || value.starts_with('/') || value.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "{} contains invalid characters: {}",
            kind, value
        )));
    }
    Ok(())
}

/// Object key of one variant.
pub fn remote_key(service_id: &str, filename: &str) -> StorageResult<String> {
    validate_segment("namespace", service_id)?;
    validate_segment("filename", filename)?;
    if filename.contains('/') {
        return Err(StorageError::InvalidKey(format!(
            "filename must not contain '/': {}",
            filename
        )));
    }
    Ok(format!("{}/{}", service_id.trim_end_matches('/'), filename))
}

/// Directory holding the variants of one request.
pub fn local_dir(root: &Path, service_id: &str) -> StorageResult<PathBuf> {
    validate_segment("namespace", service_id)?;
    Ok(root.join(service_id))
}
