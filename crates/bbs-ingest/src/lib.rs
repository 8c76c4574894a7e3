//! Post ingestion for the bulletin board.
//!
//! Turns one decoded submission into one persisted post:
//!
//! 1. Decode the `{"name", "body"}` payload.
//! 2. Classify the optional image attachment without consuming it.
//! 3. Upload the attachment under a fresh random name.
//! 4. Insert the post, referencing the uploaded blob.
//!
//! The blob is always fully written before the post that references it is
//! inserted. If the insert fails after a successful upload, the blob is
//! left behind as an orphan; the post store remains the source of truth.
//!
//! Listing is a thin read over the post store, see [`ListingService`].

pub mod classifier;
pub mod config;
pub mod error;
#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;
pub mod listing;
pub mod pipeline;
pub mod submission;

pub use classifier::{classify, ImageFormat};
pub use config::IngestConfig;
pub use error::{IngestError, IngestResult};
pub use listing::ListingService;
pub use pipeline::IngestPipeline;
pub use submission::{decode_payload, Attachment, PostFields, Submission};
