use std::net::SocketAddr;

use bbs_blob::BlobStoreConfig;
use bbs_ingest::IngestConfig;
use bbs_posts::PostStoreConfig;
use serde::{Deserialize, Serialize};

/// Default cap on a whole request body: 16 MiB.
pub const DEFAULT_MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Requests with a larger body are refused with 413 by the transport.
    pub max_body_size: usize,
    pub ingest: IngestConfig,
    pub posts: PostStoreConfig,
    pub blobs: BlobStoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            ingest: IngestConfig::default(),
            posts: PostStoreConfig::default(),
            blobs: BlobStoreConfig::default(),
        }
    }
}
