use std::time::Duration;

/// Errors from post store operations.
#[derive(Debug, thiserror::Error)]
pub enum PostStoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The operation did not finish within the caller's deadline.
    #[error("post store did not respond within {0:?}")]
    Timeout(Duration),

    /// The connection URL names no supported backend.
    #[error("unsupported database url: {0}")]
    InvalidUrl(String),

    #[error("internal post store error: {0}")]
    Internal(String),
}

/// Result alias for post store operations.
pub type PostStoreResult<T> = Result<T, PostStoreError>;
