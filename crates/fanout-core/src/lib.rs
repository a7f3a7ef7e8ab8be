//! Fanout Core Library
//!
//! This crate provides the domain types, error types and configuration shared by all
//! fanout components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod progress;

// Re-export commonly used types
pub use config::{Config, LocalUploadConfig, RemoteConfig, UploadLimits};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    Destination, DestinationOutcome, FileOutcome, FileStatus, OneOrMany, StoredArtifact,
    TierOutcome, UploadReport, UploadRequest, UploadedFile, VariantSet, VariantTier,
};
pub use progress::{NoopProgress, ProgressEvent, ProgressSink};
