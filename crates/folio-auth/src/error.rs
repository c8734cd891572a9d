use folio_storage::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("invalid or already used sign-in link")]
    InvalidToken,

    #[error("sign-in link expired, request a new one")]
    TokenExpired,

    #[error("not authenticated")]
    NotAuthenticated,

    #[error("failed to send sign-in link: {0}")]
    Mailer(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
