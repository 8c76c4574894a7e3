//! Post persistence.
//!
//! A post store is the single source of truth for which posts exist. It is
//! also the only component that assigns `created_at`: callers hand it a
//! [`NewPost`] and get back the persisted [`Post`].
//!
//! # Storage Backends
//!
//! - [`InMemoryPostStore`] -- `Vec`-based store for tests and embedding
//! - [`SqlitePostStore`] -- SQLite via sqlx, file-backed or `sqlite::memory:`
//! - [`MySqlPostStore`] -- MySQL via sqlx, the database clock assigns timestamps
//!
//! Every backend lists posts in insertion order.
//!
//! [`NewPost`]: bbs_types::NewPost
//! [`Post`]: bbs_types::Post

pub mod clock;
pub mod config;
pub mod error;
pub mod memory;
pub mod mysql;
pub mod sqlite;
pub mod traits;

pub use clock::MonotonicClock;
pub use config::PostStoreConfig;
pub use error::{PostStoreError, PostStoreResult};
pub use memory::InMemoryPostStore;
pub use mysql::MySqlPostStore;
pub use sqlite::SqlitePostStore;
pub use traits::PostStore;
