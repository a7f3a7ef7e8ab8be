//! Per-request orchestration of accepted files.
//!
//! Files go through a bounded, order-preserving worker pool. For each file the tiers are
//! rendered, named, written locally one after another, then handed to the remote store
//! as independent puts. The response only waits for the remote puts when configured to.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use fanout_core::constants::UPLOAD_SUCCESS_MESSAGE;
use fanout_core::{
    AppError, Destination, DestinationOutcome, FileOutcome, FileStatus, StoredArtifact,
    TierOutcome, UploadReport, UploadRequest, UploadedFile, VariantTier,
};
use fanout_storage::{keys, LocalPersister, RemoteStore};
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::filter::MediaFilter;
use crate::image::{RenderVariants, VariantRenderer};
use crate::naming::FilenameGenerator;

// Detached tasks: dropping the handles (client gone) leaves the puts running.
type RemotePuts = Vec<JoinHandle<(VariantTier, DestinationOutcome)>>;

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub bucket: String,
    /// Accepted files processed at once within one request.
    pub file_concurrency: usize,
    /// Join remote puts before answering.
    pub wait_for_remote: bool,
}

pub struct UploadPipeline {
    filter: MediaFilter,
    renderer: Arc<dyn RenderVariants>,
    naming: FilenameGenerator,
    local: Option<LocalPersister>,
    remote: Option<Arc<dyn RemoteStore>>,
    settings: PipelineSettings,
}

/// One file after its local phase, remote puts possibly still in flight
struct FileRun {
    outcome: FileOutcome,
    remote: Option<RemotePuts>,
}

impl UploadPipeline {
    pub fn new(
        naming: FilenameGenerator,
        local: Option<LocalPersister>,
        remote: Option<Arc<dyn RemoteStore>>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            filter: MediaFilter::default(),
            renderer: Arc::new(VariantRenderer::default()),
            naming,
            local,
            remote,
            settings,
        }
    }

    pub fn with_renderer(mut self, renderer: impl RenderVariants + 'static) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    /// Run one parsed request to completion of its local phase.
    #[tracing::instrument(skip(self, request), fields(service_id = %request.service_id, files = request.files.len()))]
    pub async fn run(&self, request: UploadRequest) -> Result<UploadReport, AppError> {
        let UploadRequest { service_id, files } = request;
        let start = Instant::now();

        let filtered = self.filter.partition(files);
        let ignored = filtered.ignored_names();
        for name in &ignored {
            tracing::info!(filename = %name, "Ignoring file with unsupported content type");
        }
        if filtered.accepted.is_empty() {
            return Err(AppError::NoAcceptedFiles);
        }

        self.provision(&service_id).await;

        let concurrency = self.settings.file_concurrency.max(1);
        let runs: Vec<FileRun> = futures::stream::iter(filtered.accepted)
            .map(|file| self.process_file(&service_id, file))
            .buffered(concurrency)
            .collect()
            .await;

        let mut files = Vec::with_capacity(runs.len());
        if self.settings.wait_for_remote {
            for run in runs {
                files.push(join_remote(run).await);
            }
        } else {
            let mut pending = Vec::with_capacity(runs.len());
            for FileRun { outcome, remote } in runs {
                files.push(outcome.clone());
                pending.push(FileRun { outcome, remote });
            }
            tokio::spawn(log_remote_outcomes(service_id.clone(), pending));
        }

        let report = UploadReport {
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
            service_id,
            files,
            ignored,
        };

        tracing::info!(
            processed = report.processed_count(),
            ignored = report.ignored.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Upload request processed"
        );

        Ok(report)
    }

    /// Make sure the remote namespace exists. Failures only warn.
    async fn provision(&self, service_id: &str) {
        let Some(remote) = &self.remote else {
            return;
        };

        match remote
            .ensure_namespace(&self.settings.bucket, service_id)
            .await
        {
            Ok(outcome) => {
                tracing::debug!(bucket = %self.settings.bucket, ?outcome, "Remote namespace ready")
            }
            Err(e) => tracing::warn!(
                bucket = %self.settings.bucket,
                backend = remote.backend_name(),
                error = %e,
                "Provisioning failed, continuing"
            ),
        }
    }

    async fn process_file(&self, service_id: &str, file: UploadedFile) -> FileRun {
        let variants = self.renderer.render_variants(file.data.clone()).await;
        if !variants.is_usable() {
            tracing::warn!(filename = %file.original_name, "Skipping file, original variant did not render");
            return FileRun {
                outcome: FileOutcome::skipped(&file, "original variant did not render"),
                remote: None,
            };
        }

        let base_name = self.naming.generate(&file.original_name, &file.content_type);

        let mut tiers: Vec<TierOutcome> = VariantTier::ALL
            .into_iter()
            .map(|tier| TierOutcome {
                tier,
                filename: tier.filename(&base_name),
                rendered: variants.get(tier).is_some(),
                local: DestinationOutcome::Skipped,
                remote: DestinationOutcome::Skipped,
            })
            .collect();

        if let Some(local) = &self.local {
            for tier in tiers.iter_mut() {
                if let Some(data) = variants.get(tier.tier) {
                    tier.local = local
                        .persist_best_effort(service_id, &tier.filename, data)
                        .await;
                }
            }
        }

        let remote = self.remote.as_ref().map(|remote| {
            let mut puts = RemotePuts::new();
            for tier in tiers.iter_mut() {
                let Some(data) = variants.get(tier.tier) else {
                    continue;
                };
                tier.remote = DestinationOutcome::Pending;
                puts.push(tokio::spawn(put_variant(
                    Arc::clone(remote),
                    self.settings.bucket.clone(),
                    service_id.to_string(),
                    tier.tier,
                    tier.filename.clone(),
                    data.clone(),
                    file.declared_content_type.clone(),
                )));
            }
            puts
        });

        tracing::debug!(
            filename = %file.original_name,
            base_name = %base_name,
            size_bytes = file.size(),
            "File rendered and persisted locally"
        );

        FileRun {
            outcome: FileOutcome {
                original_name: file.original_name,
                content_type: file.content_type,
                base_name: Some(base_name),
                status: FileStatus::Processed,
                tiers,
            },
            remote,
        }
    }
}

async fn put_variant(
    remote: Arc<dyn RemoteStore>,
    bucket: String,
    service_id: String,
    tier: VariantTier,
    filename: String,
    data: Bytes,
    content_type: String,
) -> (VariantTier, DestinationOutcome) {
    let key = match keys::remote_key(&service_id, &filename) {
        Ok(key) => key,
        Err(e) => {
            return (
                tier,
                DestinationOutcome::Failed {
                    reason: e.to_string(),
                },
            )
        }
    };

    match remote.put_public(&bucket, &key, data, &content_type).await {
        Ok(()) => (
            tier,
            DestinationOutcome::Stored {
                artifact: StoredArtifact {
                    filename,
                    destination: Destination::Remote { bucket, key },
                },
            },
        ),
        Err(e) => {
            tracing::warn!(bucket = %bucket, key = %key, tier = %tier, error = %e, "Remote put failed");
            (
                tier,
                DestinationOutcome::Failed {
                    reason: e.to_string(),
                },
            )
        }
    }
}

/// Wait for the remote puts of one file and fold them into its outcome.
async fn join_remote(run: FileRun) -> FileOutcome {
    let FileRun {
        mut outcome,
        remote,
    } = run;
    let Some(puts) = remote else {
        return outcome;
    };

    for put in puts {
        match put.await {
            Ok((tier, result)) => {
                if let Some(entry) = outcome.tiers.iter_mut().find(|t| t.tier == tier) {
                    entry.remote = result;
                }
            }
            Err(e) => tracing::error!(error = %e, "Remote put task failed"),
        }
    }
    outcome
}

async fn log_remote_outcomes(service_id: String, runs: Vec<FileRun>) {
    for run in runs {
        let outcome = join_remote(run).await;
        let stored = outcome.tiers.iter().filter(|t| t.remote.is_stored()).count();
        let failed = outcome
            .tiers
            .iter()
            .filter(|t| matches!(t.remote, DestinationOutcome::Failed { .. }))
            .count();

        if failed > 0 {
            tracing::warn!(
                service_id = %service_id,
                filename = %outcome.original_name,
                stored,
                failed,
                "Remote upload finished with failures"
            );
        } else {
            tracing::debug!(
                service_id = %service_id,
                filename = %outcome.original_name,
                stored,
                "Remote upload finished"
            );
        }
    }
}
