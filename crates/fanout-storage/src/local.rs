//! Local filesystem mirror
//!
//! Best-effort backup of every rendered variant under `<root>/<service_id>/`. A failed
//! access check or write is logged and reported in the outcome, never raised to the
//! request.

use std::path::PathBuf;

use fanout_core::{Destination, DestinationOutcome, StoredArtifact};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::keys;
use crate::traits::{StorageError, StorageResult};

/// Writes variants below one configured root directory
#[derive(Clone, Debug)]
pub struct LocalPersister {
    root: PathBuf,
}

impl LocalPersister {
    /// Create a new LocalPersister
    ///
    /// # Arguments
    /// * `root` - Root directory of the services area (e.g., "./uploads/service")
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the root directory if missing. Used at startup only; the per-variant path
    /// never creates the root itself.
    pub async fn ensure_root(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                self.root.display(),
                e
            ))
        })
    }

    /// Verify the process can list and write the root directory.
    ///
    /// Writability is checked by creating and removing a scratch file, so ownership and
    /// ACLs are honoured rather than just the permission bits.
    pub async fn check_access(&self) -> StorageResult<()> {
        let denied = |e: std::io::Error| {
            StorageError::AccessDenied(format!("{}: {}", self.root.display(), e))
        };

        let metadata = fs::metadata(&self.root).await.map_err(denied)?;
        if !metadata.is_dir() {
            return Err(StorageError::AccessDenied(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }

        let mut entries = fs::read_dir(&self.root).await.map_err(denied)?;
        entries.next_entry().await.map_err(denied)?;

        let scratch = self
            .root
            .join(format!(".access-check-{}", uuid::Uuid::new_v4()));
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&scratch)
            .await
            .map_err(denied)?;
        fs::remove_file(&scratch).await.map_err(denied)?;

        Ok(())
    }

    /// Write `data` to `<root>/<service_id>/<filename>`, overwriting an existing file.
    ///
    /// Directory creation is idempotent, so concurrent calls sharing a namespace are safe.
    pub async fn persist(
        &self,
        service_id: &str,
        filename: &str,
        data: &[u8],
    ) -> StorageResult<PathBuf> {
        self.check_access().await?;

        let dir = keys::local_dir(&self.root, service_id)?;
        if filename.contains('/') || filename.contains("..") || filename.is_empty() {
            return Err(StorageError::InvalidKey(format!(
                "invalid filename: {}",
                filename
            )));
        }

        fs::create_dir_all(&dir).await?;

        let path = dir.join(filename);
        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            path = %path.display(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Variant written locally"
        );

        Ok(path)
    }

    /// `persist` with the failure folded into the outcome.
    pub async fn persist_best_effort(
        &self,
        service_id: &str,
        filename: &str,
        data: &[u8],
    ) -> DestinationOutcome {
        match self.persist(service_id, filename, data).await {
            Ok(path) => DestinationOutcome::Stored {
                artifact: StoredArtifact {
                    filename: filename.to_string(),
                    destination: Destination::Local { path },
                },
            },
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    root = %self.root.display(),
                    service_id = %service_id,
                    filename = %filename,
                    "Local persistence skipped"
                );
                DestinationOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
