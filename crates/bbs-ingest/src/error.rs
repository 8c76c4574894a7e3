use bbs_blob::BlobError;
use bbs_posts::PostStoreError;

/// Errors from ingestion and listing.
///
/// Every variant is scoped to a single request; none is fatal to the process
/// and none is retried.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The `json` part is missing or blank, or a required field is empty.
    #[error("json is empty")]
    EmptyPayload,

    /// The `json` part is not a `{"name", "body"}` object.
    #[error("json is malformed: {0}")]
    MalformedPayload(String),

    #[error("attachment is too large: {size} bytes exceeds the {max} byte limit")]
    AttachmentTooLarge { size: u64, max: u64 },

    #[error("unsupported attachment format: {0}")]
    UnsupportedFormat(String),

    /// The attachment stream could not be read or repositioned.
    #[error("attachment I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("blob storage unavailable: {0}")]
    StorageUnavailable(#[source] BlobError),

    #[error("post store error: {0}")]
    Persistence(#[source] PostStoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IngestError {
    /// `true` for errors caused by the submission itself.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyPayload
                | Self::MalformedPayload(_)
                | Self::AttachmentTooLarge { .. }
                | Self::UnsupportedFormat(_)
        )
    }

    /// Stable short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyPayload => "empty_payload",
            Self::MalformedPayload(_) => "malformed_payload",
            Self::AttachmentTooLarge { .. } => "attachment_too_large",
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::Io(_) => "io",
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::Persistence(_) => "persistence",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result alias for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;
