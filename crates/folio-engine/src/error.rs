use folio_auth::AuthError;
use folio_core::CoreError;
use folio_storage::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SiteError>;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl SiteError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::Core(CoreError::NotFound(what.into()))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Core(CoreError::Validation(msg.into()))
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Core(CoreError::Forbidden(msg.into()))
    }
}
