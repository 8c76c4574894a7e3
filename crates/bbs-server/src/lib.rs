//! HTTP front end for the bulletin board.
//!
//! Three routes are served: the landing page at `GET /`, the post listing
//! at `GET /posts`, and multipart post creation at `POST /posts`. Every
//! other path or method is answered with `403`. Errors are JSON bodies of
//! the form `{"error": "<message>"}`.

pub mod config;
pub mod error;
pub mod handler;
pub mod multipart;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ErrorBody, ServerError, ServerResult};
pub use server::BbsServer;
pub use state::AppState;
