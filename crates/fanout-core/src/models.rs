//! Upload domain models
//!
//! Types flowing through the ingestion pipeline: the parsed request and its files, the
//! derived variant tiers, the artifacts written for them, and the per-file outcome record
//! aggregated at the end of a request.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

use bytes::Bytes;
use serde::Serialize;
use uuid::Uuid;

/// One file part of a multipart upload. Immutable once parsed.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub original_name: String,
    /// Declared MIME type, normalized (lowercase, parameters stripped).
    pub content_type: String,
    /// MIME type exactly as the client declared it; objects are stored with this value.
    pub declared_content_type: String,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(
        original_name: impl Into<String>,
        content_type: impl AsRef<str>,
        data: impl Into<Bytes>,
    ) -> Self {
        let declared = content_type.as_ref();
        Self {
            original_name: original_name.into(),
            content_type: normalize_mime_type(declared),
            declared_content_type: declared.to_string(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Normalize MIME type by stripping parameters (e.g. "image/jpeg; charset=utf-8" -> "image/jpeg").
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}

/// A single value or a sequence of values, collapsed to a sequence at the boundary.
#[derive(Clone, Debug)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(item: T) -> Self {
        OneOrMany::One(item)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(items: Vec<T>) -> Self {
        OneOrMany::Many(items)
    }
}

/// Parsed upload request. Lives for the duration of one HTTP request.
#[derive(Clone, Debug)]
pub struct UploadRequest {
    /// Per-request namespace shared by the local directory and the remote key prefix.
    pub service_id: String,
    pub files: Vec<UploadedFile>,
}

impl UploadRequest {
    /// Mint a fresh namespace of the form `<uuid>/<suffix>`.
    pub fn new(files: impl Into<OneOrMany<UploadedFile>>, namespace_suffix: &str) -> Self {
        Self {
            service_id: mint_service_id(namespace_suffix),
            files: files.into().into_vec(),
        }
    }
}

pub fn mint_service_id(namespace_suffix: &str) -> String {
    let suffix = namespace_suffix.trim_matches('/');
    if suffix.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        format!("{}/{}", Uuid::new_v4(), suffix)
    }
}

/// Derived resolution of one uploaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantTier {
    Original,
    Large,
    Medium,
    Small,
}

impl VariantTier {
    /// Persistence order.
    pub const ALL: [VariantTier; 4] = [
        VariantTier::Original,
        VariantTier::Large,
        VariantTier::Medium,
        VariantTier::Small,
    ];

    /// Bounding size of the largest dimension; `None` keeps the source size.
    pub fn max_dimension(self) -> Option<u32> {
        match self {
            VariantTier::Original => None,
            VariantTier::Large => Some(1000),
            VariantTier::Medium => Some(500),
            VariantTier::Small => Some(200),
        }
    }

    pub fn filename_prefix(self) -> &'static str {
        match self {
            VariantTier::Original => "",
            VariantTier::Large => "lg_",
            VariantTier::Medium => "md_",
            VariantTier::Small => "sm_",
        }
    }

    /// Tier filename sharing the file's base token.
    pub fn filename(self, base_name: &str) -> String {
        format!("{}{}", self.filename_prefix(), base_name)
    }
}

impl Display for VariantTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            VariantTier::Original => write!(f, "original"),
            VariantTier::Large => write!(f, "large"),
            VariantTier::Medium => write!(f, "medium"),
            VariantTier::Small => write!(f, "small"),
        }
    }
}

/// The four rendered buffers of one source image. A failed render is `None`.
#[derive(Clone, Debug, Default)]
pub struct VariantSet {
    pub original: Option<Bytes>,
    pub large: Option<Bytes>,
    pub medium: Option<Bytes>,
    pub small: Option<Bytes>,
}

impl VariantSet {
    pub fn get(&self, tier: VariantTier) -> Option<&Bytes> {
        match tier {
            VariantTier::Original => self.original.as_ref(),
            VariantTier::Large => self.large.as_ref(),
            VariantTier::Medium => self.medium.as_ref(),
            VariantTier::Small => self.small.as_ref(),
        }
    }

    pub fn set(&mut self, tier: VariantTier, data: Option<Bytes>) {
        match tier {
            VariantTier::Original => self.original = data,
            VariantTier::Large => self.large = data,
            VariantTier::Medium => self.medium = data,
            VariantTier::Small => self.small = data,
        }
    }

    /// Without the original tier nothing in the set is usable.
    pub fn is_usable(&self) -> bool {
        self.original.is_some()
    }

    /// Present tiers in persistence order.
    pub fn present(&self) -> impl Iterator<Item = (VariantTier, &Bytes)> + '_ {
        VariantTier::ALL
            .into_iter()
            .filter_map(move |tier| self.get(tier).map(|data| (tier, data)))
    }
}

/// Where an artifact was written
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Destination {
    Local { path: PathBuf },
    Remote { bucket: String, key: String },
}

impl Display for Destination {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Destination::Local { path } => write!(f, "{}", path.display()),
            Destination::Remote { bucket, key } => write!(f, "s3://{}/{}", bucket, key),
        }
    }
}

/// One persisted variant
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoredArtifact {
    pub filename: String,
    pub destination: Destination,
}

/// Result of writing one tier to one destination
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DestinationOutcome {
    Stored { artifact: StoredArtifact },
    Failed { reason: String },
    /// Destination disabled, or the tier failed to render.
    Skipped,
    /// Issued but not awaited (fire-and-forget remote put).
    Pending,
}

impl DestinationOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, DestinationOutcome::Stored { .. })
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TierOutcome {
    pub tier: VariantTier,
    pub filename: String,
    pub rendered: bool,
    pub local: DestinationOutcome,
    pub remote: DestinationOutcome,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileStatus {
    Processed,
    Skipped { reason: String },
}

/// Per-file record joined from the render, local and remote phases
#[derive(Clone, Debug, Serialize)]
pub struct FileOutcome {
    pub original_name: String,
    pub content_type: String,
    /// Shared random token of the four tiers; absent when the file was skipped.
    pub base_name: Option<String>,
    #[serde(flatten)]
    pub status: FileStatus,
    pub tiers: Vec<TierOutcome>,
}

impl FileOutcome {
    pub fn skipped(file: &UploadedFile, reason: impl Into<String>) -> Self {
        Self {
            original_name: file.original_name.clone(),
            content_type: file.content_type.clone(),
            base_name: None,
            status: FileStatus::Skipped {
                reason: reason.into(),
            },
            tiers: Vec::new(),
        }
    }

    pub fn tier(&self, tier: VariantTier) -> Option<&TierOutcome> {
        self.tiers.iter().find(|t| t.tier == tier)
    }
}

/// Aggregate result of one upload request
#[derive(Clone, Debug, Serialize)]
pub struct UploadReport {
    pub message: String,
    pub service_id: String,
    pub files: Vec<FileOutcome>,
    /// Original names of files the media filter ignored.
    pub ignored: Vec<String>,
}

impl UploadReport {
    pub fn processed_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.status == FileStatus::Processed)
            .count()
    }
}
