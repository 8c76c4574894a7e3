use std::io::{BufRead, Read, Seek};
use std::sync::Arc;

use bbs_blob::BlobStore;
use bbs_posts::{PostStore, PostStoreError};
use bbs_types::{NewPost, ObjectName, Post};
use bytes::Bytes;
use tracing::{debug, error, info, warn};

use crate::classifier::{classify, ImageFormat};
use crate::config::IngestConfig;
use crate::error::{IngestError, IngestResult};
use crate::submission::{decode_payload, Attachment, Submission};

/// Turns submissions into persisted posts.
///
/// Holds shared handles only, so one pipeline serves every request.
pub struct IngestPipeline {
    blobs: Arc<dyn BlobStore>,
    posts: Arc<dyn PostStore>,
    config: IngestConfig,
}

impl IngestPipeline {
    pub fn new(blobs: Arc<dyn BlobStore>, posts: Arc<dyn PostStore>, config: IngestConfig) -> Self {
        Self {
            blobs,
            posts,
            config,
        }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Ingest one submission.
    ///
    /// Validation failures happen before any store is touched. The upload, if
    /// any, completes before the insert is attempted.
    pub async fn ingest<R>(&self, submission: Submission<R>) -> IngestResult<Post>
    where
        R: BufRead + Seek + Send,
    {
        let result = self.run(submission).await;
        if let Err(e) = &result {
            if e.is_client_error() {
                warn!(kind = e.kind(), "submission rejected: {e}");
            } else {
                error!(kind = e.kind(), "ingestion failed: {e}");
            }
        }
        result
    }

    async fn run<R>(&self, submission: Submission<R>) -> IngestResult<Post>
    where
        R: BufRead + Seek + Send,
    {
        let fields = decode_payload(submission.payload.as_deref())?;
        debug!(name = %fields.name, "payload decoded");

        let image_url = match submission.attachment {
            Some(attachment) => {
                let (object, format, body) = self.prepare(attachment)?;
                self.upload(&object, format, body).await?
            }
            None => String::new(),
        };

        let post = NewPost::new(fields.name, fields.body).with_image_url(image_url);
        let stored = self.persist(post).await?;
        info!(
            name = %stored.name,
            image_url = %stored.image_url,
            created_at = %stored.created_at,
            "post created"
        );
        Ok(stored)
    }

    /// Classify, name, and buffer an attachment. Touches no store.
    fn prepare<R: BufRead + Seek>(
        &self,
        mut attachment: Attachment<R>,
    ) -> IngestResult<(ObjectName, ImageFormat, Bytes)> {
        let format = classify(
            &mut attachment.reader,
            attachment.declared_size,
            self.config.max_attachment_size,
        )?;
        debug!(
            %format,
            size = attachment.declared_size,
            file_name = attachment.file_name.as_deref().unwrap_or(""),
            "attachment classified"
        );

        let object = ObjectName::random(format.extension())
            .map_err(|e| IngestError::Internal(format!("could not name attachment: {e}")))?;

        let mut body = Vec::with_capacity(attachment.declared_size as usize);
        attachment.reader.read_to_end(&mut body)?;
        Ok((object, format, Bytes::from(body)))
    }

    async fn upload(&self, object: &ObjectName, format: ImageFormat, body: Bytes) -> IngestResult<String> {
        let size = body.len();
        let address = self
            .blobs
            .upload(object, body, format.mime_type())
            .await
            .map_err(IngestError::StorageUnavailable)?;
        debug!(%object, size, backend = self.blobs.backend(), %address, "attachment uploaded");
        Ok(address)
    }

    async fn persist(&self, post: NewPost) -> IngestResult<Post> {
        let image_url = post.image_url.clone();
        let insert = self.posts.insert(post);
        let outcome = match self.config.insert_timeout() {
            Some(limit) => match tokio::time::timeout(limit, insert).await {
                Ok(outcome) => outcome,
                Err(_) => Err(PostStoreError::Timeout(limit)),
            },
            None => insert.await,
        };

        outcome.map_err(|e| {
            if !image_url.is_empty() {
                error!(orphaned_blob = %image_url, "post insert failed after upload; blob left orphaned");
            }
            IngestError::Persistence(e)
        })
    }
}

impl std::fmt::Debug for IngestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestPipeline")
            .field("blobs", &self.blobs.backend())
            .field("posts", &self.posts.backend())
            .field("config", &self.config)
            .finish()
    }
}
