use async_trait::async_trait;
use bbs_types::ObjectName;
use bytes::Bytes;

use crate::error::BlobResult;

/// Named blob storage.
///
/// All implementations must satisfy these invariants:
/// - `upload` returns an address only once the full payload is durably
///   committed. A partial or failed write yields `Err`, never an address.
/// - The returned address is opaque to callers but stable: it keeps
///   resolving to the same bytes.
/// - No implicit retries.
/// - Safe for concurrent invocation from many requests.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `body` under `name` and return its retrieval address.
    async fn upload(&self, name: &ObjectName, body: Bytes, content_type: &str)
        -> BlobResult<String>;

    /// Fetch a blob previously written under `name`.
    ///
    /// Returns `Ok(None)` if nothing was written under that name.
    async fn read(&self, name: &ObjectName) -> BlobResult<Option<Bytes>>;

    /// Short backend label for logs.
    fn backend(&self) -> &'static str;
}
