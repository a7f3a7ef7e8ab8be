//! Upload service: parsed multipart body in, pipeline report out.

use std::sync::Arc;

use axum::extract::Multipart;
use fanout_core::{AppError, UploadLimits, UploadReport, UploadRequest};
use fanout_processing::UploadPipeline;

use crate::utils::upload::collect_upload_files;

pub struct UploadService {
    pipeline: Arc<UploadPipeline>,
    limits: UploadLimits,
}

impl UploadService {
    pub fn new(pipeline: Arc<UploadPipeline>, limits: UploadLimits) -> Self {
        Self { pipeline, limits }
    }

    /// Parse the body under the request ceilings, then run the pipeline.
    ///
    /// A ceiling violation returns before anything is provisioned or persisted.
    pub async fn ingest(&self, multipart: Multipart) -> Result<UploadReport, AppError> {
        let files = collect_upload_files(multipart, &self.limits).await?;
        let request = UploadRequest::new(files, &self.limits.namespace_suffix);

        tracing::debug!(
            service_id = %request.service_id,
            files = request.files.len(),
            "Upload request parsed"
        );

        self.pipeline.run(request).await
    }
}
