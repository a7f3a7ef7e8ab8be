//! Fanout Media Processing Library
//!
//! This crate turns the accepted files of one upload into persisted variant sets: media
//! filtering, filename tokens, variant rendering, and the per-request upload pipeline.

pub mod filter;
pub mod image;
pub mod naming;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use filter::{FilterOutcome, MediaFilter};
pub use image::{ImageResize, RenderError, RenderVariants, VariantRenderer};
pub use naming::FilenameGenerator;
pub use upload::{PipelineSettings, UploadPipeline};
