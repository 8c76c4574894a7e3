use std::sync::Arc;

use bbs_blob::BlobStore;
use bbs_ingest::{IngestConfig, IngestPipeline, ListingService};
use bbs_posts::PostStore;

/// Shared request state. Cloning copies two `Arc`s.
#[derive(Clone, Debug)]
pub struct AppState {
    pub pipeline: Arc<IngestPipeline>,
    pub listing: Arc<ListingService>,
}

impl AppState {
    /// Wire the pipeline and listing service over the given store handles.
    pub fn new(blobs: Arc<dyn BlobStore>, posts: Arc<dyn PostStore>, ingest: IngestConfig) -> Self {
        Self {
            pipeline: Arc::new(IngestPipeline::new(blobs, Arc::clone(&posts), ingest)),
            listing: Arc::new(ListingService::new(posts)),
        }
    }

    pub fn max_attachment_size(&self) -> u64 {
        self.pipeline.config().max_attachment_size
    }
}
