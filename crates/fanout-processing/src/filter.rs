//! Media filter: partitions uploaded files by declared content type.

use fanout_core::constants::ALLOWED_CONTENT_TYPES;
use fanout_core::models::normalize_mime_type;
use fanout_core::{OneOrMany, UploadedFile};

/// Accepted and ignored files, each in upload order
#[derive(Debug, Default)]
pub struct FilterOutcome {
    pub accepted: Vec<UploadedFile>,
    pub ignored: Vec<UploadedFile>,
}

impl FilterOutcome {
    pub fn ignored_names(&self) -> Vec<String> {
        self.ignored
            .iter()
            .map(|f| f.original_name.clone())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct MediaFilter {
    allowed: Vec<String>,
}

impl Default for MediaFilter {
    fn default() -> Self {
        Self {
            allowed: ALLOWED_CONTENT_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl MediaFilter {
    pub fn new(allowed: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        Self {
            allowed: allowed
                .into_iter()
                .map(|s| normalize_mime_type(s.as_ref()))
                .collect(),
        }
    }

    /// Exact membership of the normalized type in the allow-list.
    pub fn accepts(&self, content_type: &str) -> bool {
        let normalized = normalize_mime_type(content_type);
        self.allowed.iter().any(|allowed| *allowed == normalized)
    }

    pub fn partition(&self, files: impl Into<OneOrMany<UploadedFile>>) -> FilterOutcome {
        let (accepted, ignored) = files
            .into()
            .into_vec()
            .into_iter()
            .partition(|file| self.accepts(&file.content_type));
        FilterOutcome { accepted, ignored }
    }
}
