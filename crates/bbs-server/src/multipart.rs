use std::io::Cursor;

use axum::extract::Multipart;
use bbs_ingest::{Attachment, Submission};
use bytes::BytesMut;
use tracing::debug;

use crate::error::ApiError;

/// Multipart field carrying the `{"name", "body"}` payload.
pub const JSON_FIELD: &str = "json";
/// Multipart field carrying the optional image.
pub const ATTACHMENT_FIELD: &str = "attachment-file";

/// Decode a create request into a [`Submission`].
///
/// The attachment is buffered only up to `max_attachment_size`; beyond that,
/// chunks are counted and dropped so the declared size is still exact while
/// memory stays bounded. A file input submitted with no file chosen (empty
/// file name, no bytes) counts as no attachment. Only the first occurrence of
/// each field is used.
pub async fn read_submission(
    mut multipart: Multipart,
    max_attachment_size: u64,
) -> Result<Submission, ApiError> {
    let mut payload: Option<String> = None;
    let mut attachment: Option<Attachment> = None;

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            JSON_FIELD if payload.is_none() => {
                payload = Some(field.text().await?);
            }
            ATTACHMENT_FIELD if attachment.is_none() => {
                let file_name = field.file_name().map(str::to_owned);
                let mut declared_size = 0u64;
                let mut buffer = BytesMut::new();
                while let Some(chunk) = field.chunk().await? {
                    declared_size += chunk.len() as u64;
                    if declared_size <= max_attachment_size {
                        buffer.extend_from_slice(&chunk);
                    }
                }

                let no_file_chosen =
                    declared_size == 0 && file_name.as_deref().map_or(true, str::is_empty);
                if no_file_chosen {
                    debug!("empty attachment part ignored");
                    continue;
                }
                debug!(size = declared_size, "attachment part received");
                attachment = Some(Attachment {
                    file_name,
                    declared_size,
                    reader: Cursor::new(buffer.freeze()),
                });
            }
            other => {
                debug!(field = other, "multipart field skipped");
            }
        }
    }

    Ok(Submission {
        payload,
        attachment,
    })
}
