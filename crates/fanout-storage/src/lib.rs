//! Fanout Storage Library
//!
//! Destinations for rendered variants: the best-effort local filesystem mirror and the
//! remote object store.
//!
//! # Layout
//!
//! Both destinations share one per-request namespace (`service_id`, `<uuid>/<suffix>`):
//!
//! - **Local**: `<services_dir>/<service_id>/<filename>`
//! - **Remote**: bucket `<bucket>`, key `<service_id>/<filename>`
//!
//! Namespaces and filenames must not contain `..` or a leading `/`. Path and key building
//! is centralized in the `keys` module so both destinations stay consistent.

pub mod factory;
pub mod keys;
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_remote_store;
pub use local::LocalPersister;
#[cfg(feature = "storage-s3")]
pub use s3::S3RemoteStore;
pub use traits::{ProvisionOutcome, RemoteStore, StorageError, StorageResult};
