//! Upload pipeline: filter → provision → render → persist (local, remote).

mod pipeline;

pub use pipeline::{PipelineSettings, UploadPipeline};
