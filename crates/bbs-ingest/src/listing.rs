use std::sync::Arc;

use bbs_posts::PostStore;
use bbs_types::Post;
use tracing::{debug, error};

use crate::error::{IngestError, IngestResult};

/// Read side: every stored post, in insertion order.
pub struct ListingService {
    posts: Arc<dyn PostStore>,
}

impl ListingService {
    pub fn new(posts: Arc<dyn PostStore>) -> Self {
        Self { posts }
    }

    /// All posts, oldest first. An empty store yields an empty `Vec`.
    pub async fn list_all(&self) -> IngestResult<Vec<Post>> {
        match self.posts.all().await {
            Ok(posts) => {
                debug!(count = posts.len(), backend = self.posts.backend(), "posts listed");
                Ok(posts)
            }
            Err(e) => {
                error!(backend = self.posts.backend(), "listing failed: {e}");
                Err(IngestError::Persistence(e))
            }
        }
    }
}

impl std::fmt::Debug for ListingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingService")
            .field("posts", &self.posts.backend())
            .finish()
    }
}
