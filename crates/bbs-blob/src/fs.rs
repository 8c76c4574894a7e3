use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use bbs_types::ObjectName;
use bytes::Bytes;
use rand::Rng;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::{BlobError, BlobResult};
use crate::traits::BlobStore;

/// Blob store backed by a local directory.
///
/// Each upload is written to a hidden temporary file in the same directory,
/// flushed to disk, then renamed over the final name. The rename is the
/// commit point: a reader never observes a partially written blob and no
/// address is handed out before the rename succeeds.
#[derive(Debug)]
pub struct FsBlobStore {
    root: PathBuf,
    public_base_url: Option<String>,
    timeout: Duration,
}

impl FsBlobStore {
    /// Open (or create) a store rooted at `root`.
    ///
    /// With a `public_base_url`, addresses are `<public_base_url>/<name>`;
    /// otherwise they are absolute file paths.
    pub async fn open(
        root: impl Into<PathBuf>,
        public_base_url: Option<String>,
        timeout: Duration,
    ) -> BlobResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        let root = tokio::fs::canonicalize(&root).await?;
        Ok(Self {
            root,
            public_base_url: public_base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            timeout,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, name: &ObjectName) -> PathBuf {
        self.root.join(name.as_str())
    }

    fn address_for(&self, name: &ObjectName) -> String {
        match &self.public_base_url {
            Some(base) => format!("{base}/{name}"),
            None => self.path_for(name).display().to_string(),
        }
    }

    fn temp_path_for(&self, name: &ObjectName) -> PathBuf {
        let suffix: u64 = rand::thread_rng().gen();
        self.root.join(format!(".{name}.tmp-{suffix:016x}"))
    }

    async fn write_committed(&self, tmp: &Path, dest: &Path, body: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::File::create(tmp).await?;
        file.write_all(body).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(tmp, dest).await
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn upload(
        &self,
        name: &ObjectName,
        body: Bytes,
        _content_type: &str,
    ) -> BlobResult<String> {
        let dest = self.path_for(name);
        let tmp = self.temp_path_for(name);

        let outcome = tokio::time::timeout(self.timeout, self.write_committed(&tmp, &dest, &body)).await;
        let result = match outcome {
            Ok(Ok(())) => {
                debug!(%name, bytes = body.len(), "blob committed to disk");
                return Ok(self.address_for(name));
            }
            Ok(Err(e)) => Err(BlobError::Write {
                name: name.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(BlobError::Timeout {
                name: name.to_string(),
                after: self.timeout,
            }),
        };

        if let Err(e) = tokio::fs::remove_file(&tmp).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %tmp.display(), "failed to remove temporary blob: {e}");
            }
        }
        result
    }

    async fn read(&self, name: &ObjectName) -> BlobResult<Option<Bytes>> {
        match tokio::fs::read(self.path_for(name)).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BlobError::Read {
                name: name.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn backend(&self) -> &'static str {
        "filesystem"
    }
}
