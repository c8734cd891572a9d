//! Mapping library errors onto HTTP responses

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use folio_auth::AuthError;
use folio_core::CoreError;
use folio_engine::SiteError;
use folio_storage::StorageError;
use serde_json::json;
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::NotFound(m)
            | Self::BadRequest(m)
            | Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::Internal(m) => m,
        }
    }

    fn internal(err: impl std::fmt::Display) -> Self {
        error!("Request failed: {}", err);
        Self::Internal("something went wrong, please try again".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(what) => Self::NotFound(format!("{what} not found")),
            CoreError::Validation(_) | CoreError::FrontMatter(_) => Self::BadRequest(err.to_string()),
            CoreError::Unauthorized => Self::Unauthorized(err.to_string()),
            CoreError::Forbidden(msg) => Self::Forbidden(msg),
            other => Self::internal(other),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => Self::NotFound(format!("{what} not found")),
            other => Self::internal(other),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidEmail(_) => Self::BadRequest(err.to_string()),
            AuthError::InvalidToken | AuthError::TokenExpired | AuthError::NotAuthenticated => {
                Self::Unauthorized(err.to_string())
            }
            AuthError::Storage(e) => e.into(),
            AuthError::Mailer(_) => Self::internal(err),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<SiteError> for ApiError {
    fn from(err: SiteError) -> Self {
        match err {
            SiteError::Core(e) => e.into(),
            SiteError::Storage(e) => e.into(),
            SiteError::Auth(e) => e.into(),
        }
    }
}
