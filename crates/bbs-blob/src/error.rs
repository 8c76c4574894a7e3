use std::time::Duration;

/// Errors from blob store operations.
///
/// Any error returned from an upload means no address exists for the blob.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// The payload could not be fully transferred or committed.
    #[error("write of {name} failed: {reason}")]
    Write { name: String, reason: String },

    /// The upload did not complete within the backend's deadline.
    #[error("upload of {name} timed out after {after:?}")]
    Timeout { name: String, after: Duration },

    /// A previously written blob could not be fetched.
    #[error("read of {name} failed: {reason}")]
    Read { name: String, reason: String },

    /// The backend could not be set up.
    #[error("blob store configuration error: {0}")]
    Config(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for blob store operations.
pub type BlobResult<T> = Result<T, BlobError>;
