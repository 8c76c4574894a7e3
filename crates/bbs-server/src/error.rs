use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use bbs_ingest::IngestError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("blob store error: {0}")]
    Blob(#[from] bbs_blob::BlobError),

    #[error("post store error: {0}")]
    Posts(#[from] bbs_posts::PostStoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// JSON error body: `{"error": "<message>"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// An error response on its way to the client.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, "Forbidden")
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        let status = match &err {
            IngestError::EmptyPayload | IngestError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            IngestError::AttachmentTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            IngestError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            IngestError::Io(_)
            | IngestError::StorageUnavailable(_)
            | IngestError::Persistence(_)
            | IngestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::new(err.status(), err.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbs_posts::PostStoreError;

    #[test]
    fn ingest_errors_map_to_statuses() {
        let cases = [
            (IngestError::EmptyPayload, StatusCode::BAD_REQUEST),
            (IngestError::MalformedPayload("x".into()), StatusCode::BAD_REQUEST),
            (
                IngestError::AttachmentTooLarge { size: 3, max: 2 },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (
                IngestError::UnsupportedFormat("text".into()),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (
                IngestError::Persistence(PostStoreError::Internal("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (IngestError::Internal("rng".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn message_is_display_output() {
        let api = ApiError::from(IngestError::EmptyPayload);
        assert_eq!(api.message, "json is empty");
    }

    #[test]
    fn forbidden_body() {
        let api = ApiError::forbidden();
        assert_eq!(api.status, StatusCode::FORBIDDEN);
        assert_eq!(api.message, "Forbidden");
    }
}
