//! Service initialization

use std::sync::Arc;

use anyhow::{Context, Result};
use fanout_core::Config;
use fanout_processing::{FilenameGenerator, PipelineSettings, UploadPipeline, VariantRenderer};
use fanout_storage::{create_remote_store, LocalPersister, RemoteStore};

use crate::services::progress::ProgressRegistry;
use crate::state::AppState;

/// Build the application state from configuration.
pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let remote = create_remote_store(config)
        .await
        .context("Failed to initialize remote store")?;

    let local = setup_local_areas(config).await?;

    build_state(config.clone(), local, remote)
}

/// Create both local areas (users, services) when local upload is enabled.
///
/// Returns the persister for the services area.
pub async fn setup_local_areas(config: &Config) -> Result<Option<LocalPersister>> {
    if !config.local.enabled {
        tracing::info!("Local upload disabled");
        return Ok(None);
    }

    LocalPersister::new(&config.local.users_dir)
        .ensure_root()
        .await
        .context("Failed to create local users directory")?;

    let services = LocalPersister::new(&config.local.services_dir);
    services
        .ensure_root()
        .await
        .context("Failed to create local services directory")?;

    tracing::info!(
        users_dir = %config.local.users_dir.display(),
        services_dir = %config.local.services_dir.display(),
        "Local upload enabled"
    );

    Ok(Some(services))
}

/// Assemble the state from already-built destinations.
pub fn build_state(
    config: Config,
    local: Option<LocalPersister>,
    remote: Option<Arc<dyn RemoteStore>>,
) -> Result<Arc<AppState>> {
    let naming = FilenameGenerator::new(&config.filename_secret)?;

    let pipeline = UploadPipeline::new(
        naming,
        local,
        remote,
        PipelineSettings {
            bucket: config.remote.bucket.clone(),
            file_concurrency: config.limits.file_concurrency,
            wait_for_remote: config.limits.wait_for_remote,
        },
    )
    .with_renderer(VariantRenderer::with_jpeg_quality(
        config.limits.jpeg_quality,
    ));

    Ok(Arc::new(AppState {
        config,
        pipeline: Arc::new(pipeline),
        progress: Arc::new(ProgressRegistry::new()),
    }))
}
