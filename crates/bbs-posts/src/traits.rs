use async_trait::async_trait;
use bbs_types::{NewPost, Post};

use crate::error::PostStoreResult;

/// Durable storage for posts.
///
/// Implementations must be safe for concurrent use; a single handle is
/// shared by every request.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Persist a post, assigning its `created_at`.
    async fn insert(&self, post: NewPost) -> PostStoreResult<Post>;

    /// Every stored post, oldest first. Empty when nothing has been stored.
    async fn all(&self) -> PostStoreResult<Vec<Post>>;

    /// Release pooled resources. Called once at shutdown.
    async fn close(&self) -> PostStoreResult<()> {
        Ok(())
    }

    /// Short backend label for logs.
    fn backend(&self) -> &'static str;
}
