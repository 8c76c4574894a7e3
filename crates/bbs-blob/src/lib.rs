//! Named blob storage for post attachments.
//!
//! A blob store writes a byte payload under a caller-chosen [`ObjectName`]
//! and hands back an address that can later be used to fetch exactly those
//! bytes. The ingestion pipeline only ever sees the [`BlobStore`] trait.
//!
//! # Storage Backends
//!
//! - [`InMemoryBlobStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsBlobStore`] -- local directory, committed by atomic rename
//! - [`S3BlobStore`] -- any S3-compatible object store
//!
//! # Design Rules
//!
//! 1. An address is returned only after the write is fully committed.
//! 2. One attempt per upload. Retrying is the caller's business.
//! 3. Network and disk backends bound each upload with their own deadline.
//! 4. Handles are shared across requests and safe for concurrent use.
//!
//! [`ObjectName`]: bbs_types::ObjectName

pub mod config;
pub mod error;
pub mod fs;
pub mod memory;
pub mod s3;
pub mod traits;

pub use config::{BlobBackend, BlobStoreConfig};
pub use error::{BlobError, BlobResult};
pub use fs::FsBlobStore;
pub use memory::InMemoryBlobStore;
pub use s3::S3BlobStore;
pub use traits::BlobStore;
