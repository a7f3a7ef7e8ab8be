//! Remote store abstraction
//!
//! This module defines the `RemoteStore` trait implemented by object-store backends,
//! and the error type shared by every destination.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Provisioning failed: {0}")]
    ProvisionFailed(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// What a provisioning call found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    Created,
    /// The bucket was already there (owned by us or shared); treated as success.
    AlreadyExists,
}

/// Object-store destination of the pipeline
///
/// Implementations must be safe to call concurrently: the pipeline issues the puts of
/// one file's tiers in parallel.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Ensure the bucket that will hold `namespace` exists.
    ///
    /// An "already exists" answer is not an error.
    async fn ensure_namespace(&self, bucket: &str, namespace: &str)
        -> StorageResult<ProvisionOutcome>;

    /// Put one object with public-read visibility.
    async fn put_public(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()>;

    /// Backend name for log fields
    fn backend_name(&self) -> &'static str;
}
