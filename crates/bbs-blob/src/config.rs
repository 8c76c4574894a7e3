use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::BlobResult;
use crate::fs::FsBlobStore;
use crate::memory::InMemoryBlobStore;
use crate::s3::{S3BlobStore, DEFAULT_PUBLIC_BASE_URL};
use crate::traits::BlobStore;

/// Blob store selection plus settings shared by every backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobStoreConfig {
    #[serde(flatten)]
    pub backend: BlobBackend,
    /// Deadline for a single upload.
    #[serde(default = "default_upload_timeout_secs")]
    pub upload_timeout_secs: u64,
}

fn default_upload_timeout_secs() -> u64 {
    60
}

fn default_public_base_url() -> String {
    DEFAULT_PUBLIC_BASE_URL.to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum BlobBackend {
    Memory,
    Filesystem {
        root: PathBuf,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        public_base_url: Option<String>,
    },
    S3 {
        bucket: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        endpoint: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        region: Option<String>,
        #[serde(default = "default_public_base_url")]
        public_base_url: String,
    },
}

impl Default for BlobStoreConfig {
    fn default() -> Self {
        Self {
            backend: BlobBackend::Filesystem {
                root: PathBuf::from("uploads"),
                public_base_url: None,
            },
            upload_timeout_secs: default_upload_timeout_secs(),
        }
    }
}

impl BlobStoreConfig {
    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    /// Open the configured backend as a shared handle.
    pub async fn open(&self) -> BlobResult<Arc<dyn BlobStore>> {
        let timeout = self.upload_timeout();
        let store: Arc<dyn BlobStore> = match &self.backend {
            BlobBackend::Memory => Arc::new(InMemoryBlobStore::new()),
            BlobBackend::Filesystem {
                root,
                public_base_url,
            } => Arc::new(FsBlobStore::open(root, public_base_url.clone(), timeout).await?),
            BlobBackend::S3 {
                bucket,
                endpoint,
                region,
                public_base_url,
            } => Arc::new(
                S3BlobStore::connect(
                    bucket,
                    endpoint.as_deref(),
                    region.as_deref(),
                    public_base_url,
                    timeout,
                )
                .await?,
            ),
        };
        Ok(store)
    }
}
