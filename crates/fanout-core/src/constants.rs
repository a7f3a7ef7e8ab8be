//! Shared constants

/// Default destination bucket for remote persistence.
pub const DEFAULT_BUCKET: &str = "superapp-upload-services";

/// Default object-store region.
pub const DEFAULT_REGION: &str = "ap-south-1";

/// Default suffix appended to the per-request uuid (`<uuid>/posts/images`).
pub const DEFAULT_NAMESPACE_SUFFIX: &str = "posts/images";

/// 4 MiB per file.
pub const DEFAULT_MAX_FILE_SIZE_BYTES: usize = 1024 * 1024 * 4;

pub const DEFAULT_MAX_UPLOAD_COUNT: usize = 10;

/// Encoder quality of JPEG variants.
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Multipart field carrying the uploaded files.
pub const FILES_FIELD: &str = "files";

/// MIME types the media filter accepts.
pub const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// Aggregate response body when every accepted file went through the local phase.
pub const UPLOAD_SUCCESS_MESSAGE: &str = "all files uploaded";
