//! Error types for folio-storage

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid timestamp: {0}")]
    Timestamp(#[from] time::error::ComponentRange),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
