//! Common utilities for the upload handler

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Multipart, Request};
use axum::http::{header, HeaderMap};
use fanout_core::constants::FILES_FIELD;
use fanout_core::{AppError, ProgressEvent, ProgressSink, UploadLimits, UploadedFile};
use futures::StreamExt;

use crate::error::multipart_error;

/// Header naming the progress session of an upload.
pub const SESSION_HEADER: &str = "x-upload-session";

/// Declared body length, 0 when absent or unparsable.
pub fn content_length(headers: &HeaderMap) -> u64 {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

/// Session named by the `X-Upload-Session` header, falling back to the query value.
pub fn upload_session(headers: &HeaderMap, query: Option<&str>) -> Option<String> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .or(query)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Rebuild the request so every body chunk reports the cumulative byte count.
pub fn with_progress(request: Request, sink: Arc<dyn ProgressSink>) -> Request {
    let expected = content_length(request.headers());
    let (parts, body) = request.into_parts();

    let mut received: u64 = 0;
    let counted = body.into_data_stream().map(move |chunk| {
        if let Ok(data) = &chunk {
            received += data.len() as u64;
            sink.report(ProgressEvent::new(received, expected));
        }
        chunk
    });

    Request::from_parts(parts, Body::from_stream(counted))
}

/// Read every `files` part of the body under the request ceilings.
///
/// The count ceiling is checked as parts arrive, so an oversized request stops at the
/// first part over the limit. Empty parts (a form submitted without a selection) are
/// skipped. Other fields are ignored.
pub async fn collect_upload_files(
    mut multipart: Multipart,
    limits: &UploadLimits,
) -> Result<Vec<UploadedFile>, AppError> {
    let max_total = limits.max_total_bytes();
    let mut files = Vec::new();
    let mut total_bytes: usize = 0;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        if files.len() >= limits.max_upload_count {
            return Err(AppError::TooManyFiles {
                max: limits.max_upload_count,
            });
        }

        let data = field.bytes().await.map_err(multipart_error)?;
        if data.is_empty() && original_name.is_empty() {
            continue;
        }

        total_bytes = total_bytes.saturating_add(data.len());
        if total_bytes > max_total {
            return Err(AppError::PayloadTooLarge(format!(
                "maxFileSize exceeded, received {} bytes of file data, limit is {} bytes",
                total_bytes, max_total
            )));
        }

        files.push(UploadedFile::new(original_name, content_type, data));
    }

    if files.is_empty() {
        return Err(AppError::NoFiles);
    }

    Ok(files)
}
