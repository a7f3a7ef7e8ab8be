#[cfg(feature = "storage-s3")]
use crate::S3RemoteStore;
use crate::{RemoteStore, StorageResult};
use fanout_core::Config;
use std::sync::Arc;

/// Create the remote store described by the configuration
///
/// Returns `None` when remote upload is disabled.
pub async fn create_remote_store(config: &Config) -> StorageResult<Option<Arc<dyn RemoteStore>>> {
    if !config.remote.enabled {
        tracing::info!("Remote upload disabled");
        return Ok(None);
    }

    #[cfg(feature = "storage-s3")]
    {
        let store = S3RemoteStore::new(&config.remote).await?;
        tracing::info!(
            bucket = %config.remote.bucket,
            region = %config.remote.region,
            "S3 remote store initialized"
        );
        Ok(Some(Arc::new(store)))
    }

    #[cfg(not(feature = "storage-s3"))]
    Err(crate::StorageError::ConfigError(
        "S3 remote store not available (storage-s3 feature not enabled)".to_string(),
    ))
}
