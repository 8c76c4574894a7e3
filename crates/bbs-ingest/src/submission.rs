use std::io::Cursor;

use bytes::Bytes;
use serde::Deserialize;

use crate::error::{IngestError, IngestResult};

/// Decoded shape of the `json` part.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PostFields {
    pub name: String,
    pub body: String,
}

/// Decode the `json` part of a submission.
///
/// A missing or blank payload is [`IngestError::EmptyPayload`], as is a
/// well-formed payload whose `name` or `body` is empty. Anything that does
/// not parse into [`PostFields`] is [`IngestError::MalformedPayload`].
pub fn decode_payload(payload: Option<&str>) -> IngestResult<PostFields> {
    let payload = match payload {
        Some(p) if !p.trim().is_empty() => p,
        _ => return Err(IngestError::EmptyPayload),
    };
    let fields: PostFields = serde_json::from_str(payload)
        .map_err(|e| IngestError::MalformedPayload(e.to_string()))?;
    if fields.name.is_empty() || fields.body.is_empty() {
        return Err(IngestError::EmptyPayload);
    }
    Ok(fields)
}

/// One create request, as handed over by the transport.
#[derive(Debug)]
pub struct Submission<R = Cursor<Bytes>> {
    /// Raw text of the `json` part, if the request had one.
    pub payload: Option<String>,
    pub attachment: Option<Attachment<R>>,
}

impl Submission {
    /// A submission without an attachment.
    pub fn text(payload: impl Into<String>) -> Self {
        Self {
            payload: Some(payload.into()),
            attachment: None,
        }
    }
}

impl<R> Submission<R> {
    pub fn with_attachment(payload: Option<String>, attachment: Attachment<R>) -> Self {
        Self {
            payload,
            attachment: Some(attachment),
        }
    }
}

/// The `attachment-file` part.
#[derive(Debug)]
pub struct Attachment<R = Cursor<Bytes>> {
    /// Client-supplied file name. Informational only; never used for storage.
    pub file_name: Option<String>,
    /// Length of the part as seen by the transport.
    pub declared_size: u64,
    pub reader: R,
}

impl Attachment {
    /// Wrap fully buffered bytes, declaring their exact length.
    pub fn from_bytes(file_name: Option<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            file_name,
            declared_size: data.len() as u64,
            reader: Cursor::new(data),
        }
    }
}
