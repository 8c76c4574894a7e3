use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object name {name:?}: {reason}")]
    InvalidObjectName { name: String, reason: &'static str },

    #[error("randomness unavailable: {0}")]
    Randomness(String),
}
