//! Error types for folio-content

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContentError>;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Failed to fetch {path}: {reason}")]
    Fetch { path: String, reason: String },

    #[error("{file}: missing required field '{field}'")]
    MissingField { file: String, field: String },

    #[error("{file}: {reason}")]
    Invalid { file: String, reason: String },

    #[error("Invalid content path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
