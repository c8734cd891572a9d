//! Request extractors: bearer sessions plus JSON and query wrappers whose
//! rejections use the API error body

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use folio_auth::AuthError;
use folio_core::User;

use crate::error::ApiError;
use crate::state::AppState;

/// `axum::Json` with rejections reported as [`ApiError`]
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Query` with rejections reported as [`ApiError`]
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// A signed-in reader; rejects the request with 401 otherwise
pub struct CurrentUser(pub User);

/// The reader if a valid session is presented
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AuthError::NotAuthenticated)?;
        let user = state.site().auth().authenticate(token).await?;
        Ok(Self(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(Self(None));
        };

        match state.site().auth().authenticate(token).await {
            Ok(user) => Ok(Self(Some(user))),
            Err(AuthError::NotAuthenticated) => Ok(Self(None)),
            Err(e) => Err(e.into()),
        }
    }
}
