//! Upload progress events
//!
//! While the request body streams in, the API layer reports cumulative byte counts to a
//! `ProgressSink`. Sinks must not block: they are called from inside the body stream.

use serde::Serialize;

/// Cumulative body bytes received so far for one upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "progress", rename_all = "camelCase")]
pub struct ProgressEvent {
    pub bytes_received: u64,
    /// Declared body length (Content-Length), 0 when the client sent none.
    pub bytes_expected: u64,
}

impl ProgressEvent {
    pub fn new(bytes_received: u64, bytes_expected: u64) -> Self {
        Self {
            bytes_received,
            bytes_expected,
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// Sink used when nobody subscribed to the upload
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}
