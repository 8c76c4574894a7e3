use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use bbs_types::ObjectName;
use bytes::Bytes;

use crate::error::BlobResult;
use crate::traits::BlobStore;

/// Address scheme used by [`InMemoryBlobStore`].
pub const MEMORY_SCHEME: &str = "memory://";

#[derive(Clone, Debug)]
struct StoredBlob {
    data: Bytes,
    content_type: String,
}

/// In-memory, HashMap-based blob store.
///
/// Intended for tests and embedding. Addresses have the form
/// `memory://<name>`. The store also counts upload calls so tests can assert
/// that validation failures never reach storage.
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<ObjectName, StoredBlob>>,
    uploads: AtomicUsize,
}

impl InMemoryBlobStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
            uploads: AtomicUsize::new(0),
        }
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    /// How many times `upload` has been called.
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    /// Content type recorded for `name`.
    pub fn content_type(&self, name: &ObjectName) -> Option<String> {
        self.blobs
            .read()
            .expect("lock poisoned")
            .get(name)
            .map(|b| b.content_type.clone())
    }

    /// Resolve an address previously returned by this store.
    pub fn resolve(&self, address: &str) -> Option<Bytes> {
        let name = ObjectName::parse(address.strip_prefix(MEMORY_SCHEME)?).ok()?;
        self.blobs
            .read()
            .expect("lock poisoned")
            .get(&name)
            .map(|b| b.data.clone())
    }

    fn address(name: &ObjectName) -> String {
        format!("{MEMORY_SCHEME}{name}")
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(
        &self,
        name: &ObjectName,
        body: Bytes,
        content_type: &str,
    ) -> BlobResult<String> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        let mut map = self.blobs.write().expect("lock poisoned");
        map.insert(
            name.clone(),
            StoredBlob {
                data: body,
                content_type: content_type.to_string(),
            },
        );
        Ok(Self::address(name))
    }

    async fn read(&self, name: &ObjectName) -> BlobResult<Option<Bytes>> {
        let map = self.blobs.read().expect("lock poisoned");
        Ok(map.get(name).map(|b| b.data.clone()))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("blob_count", &self.len())
            .field("upload_count", &self.upload_count())
            .finish()
    }
}
