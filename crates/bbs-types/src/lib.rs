//! Foundation types for the bulletin board.
//!
//! Every other `bbs-*` crate depends on `bbs-types`.
//!
//! # Key Types
//!
//! - [`Post`] -- A persisted post, as stored and served
//! - [`NewPost`] -- A post that has not reached the post store yet
//! - [`ObjectName`] -- A validated, collision-resistant blob object name

pub mod error;
pub mod object;
pub mod post;

pub use error::TypeError;
pub use object::ObjectName;
pub use post::{NewPost, Post};
