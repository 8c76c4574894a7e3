use std::sync::RwLock;

use async_trait::async_trait;
use bbs_types::{NewPost, Post};

use crate::clock::MonotonicClock;
use crate::error::PostStoreResult;
use crate::traits::PostStore;

/// In-memory, Vec-based post store.
///
/// Intended for tests and embedding. Posts are lost when the store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryPostStore {
    posts: RwLock<Vec<Post>>,
    clock: MonotonicClock,
}

impl InMemoryPostStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of posts stored.
    pub fn len(&self) -> usize {
        self.posts.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.posts.read().expect("lock poisoned").is_empty()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn insert(&self, post: NewPost) -> PostStoreResult<Post> {
        // Stamp under the write lock so timestamps follow insertion order.
        let mut posts = self.posts.write().expect("lock poisoned");
        let stored = post.into_post(self.clock.now());
        posts.push(stored.clone());
        Ok(stored)
    }

    async fn all(&self) -> PostStoreResult<Vec<Post>> {
        Ok(self.posts.read().expect("lock poisoned").clone())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
