//! Error types module
//!
//! This module provides the core error types used throughout the fanout service.
//! Request-fatal failures of the upload endpoint are unified under `AppError`; failures
//! that only affect one file, one variant tier or one destination never become an
//! `AppError` and are recorded in the per-file outcome instead.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like rejected uploads
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "TOO_MANY_FILES")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to parse multipart body: {0}")]
    MultipartParse(String),

    #[error("No files field present in the request")]
    NoFiles,

    #[error("Too many files: at most {max} files are allowed")]
    TooManyFiles { max: usize },

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("No uploaded file passed the media filter")]
    NoAcceptedFiles,

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl AppError {
    /// Get the error type name for log fields
    pub fn error_type(&self) -> &str {
        match self {
            AppError::MultipartParse(_) => "MultipartParse",
            AppError::NoFiles => "NoFiles",
            AppError::TooManyFiles { .. } => "TooManyFiles",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::NoAcceptedFiles => "NoAcceptedFiles",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    // Every request-fatal upload failure is reported as a 500 with a plain-text body;
    // browser clients of the upload form only distinguish success from failure.
    fn http_status_code(&self) -> u16 {
        500
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::MultipartParse(_) => "MULTIPART_PARSE_ERROR",
            AppError::NoFiles => "NO_FILES",
            AppError::TooManyFiles { .. } => "TOO_MANY_FILES",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::NoAcceptedFiles => "NO_ACCEPTED_FILES",
            AppError::InternalWithSource { .. } => "INTERNAL_ERROR",
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::MultipartParse(ref msg) => msg.clone(),
            AppError::NoFiles => "please select some files to upload".to_string(),
            AppError::TooManyFiles { max } => format!(
                "please remove some images, only {} files are allowed to upload",
                max
            ),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::NoAcceptedFiles => "invalid files given.".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::MultipartParse(_)
            | AppError::NoFiles
            | AppError::TooManyFiles { .. }
            | AppError::PayloadTooLarge(_)
            | AppError::NoAcceptedFiles => LogLevel::Warn,
            AppError::InternalWithSource { .. } => LogLevel::Error,
        }
    }
}
