//! Magic-link sign-in

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use folio_auth::{AuthError, Session};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery, CurrentUser, bearer_token};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MagicLinkRequest {
    email: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    token: String,
}

/// POST /auth/magic-link
pub async fn request_link(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<MagicLinkRequest>,
) -> Result<Json<Value>, ApiError> {
    state.site().auth().request_link(&req.email).await?;
    Ok(Json(json!({ "message": "Check your email for a sign-in link" })))
}

/// GET /auth/callback?token=
pub async fn callback(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<CallbackParams>,
) -> Result<Json<Session>, ApiError> {
    Ok(Json(state.site().auth().redeem(&params.token).await?))
}

/// GET /auth/session
pub async fn session(CurrentUser(user): CurrentUser) -> Json<Value> {
    Json(json!({ "user": user }))
}

/// POST /auth/logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Value>, ApiError> {
    let token = bearer_token(&headers).ok_or(AuthError::NotAuthenticated)?;
    let signed_out = state.site().auth().sign_out(token).await?;
    Ok(Json(json!({ "signed_out": signed_out })))
}
