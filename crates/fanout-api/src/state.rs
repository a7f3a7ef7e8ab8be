use std::sync::Arc;

use fanout_core::Config;
use fanout_processing::UploadPipeline;

use crate::services::progress::ProgressRegistry;

pub struct AppState {
    pub config: Config,
    pub pipeline: Arc<UploadPipeline>,
    pub progress: Arc<ProgressRegistry>,
}
