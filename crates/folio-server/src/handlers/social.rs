//! Votes, comments and likes

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use folio_core::{Comment, LikeState, VoteKind, VoteSummary};
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::{ApiJson, CurrentUser, MaybeUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    kind: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    content: String,
}

/// GET /api/blog/:slug/votes
pub async fn get_votes(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    MaybeUser(viewer): MaybeUser,
) -> Result<Json<VoteSummary>, ApiError> {
    Ok(Json(state.site().votes(&slug, viewer.as_ref()).await?))
}

/// POST /api/blog/:slug/votes - toggle the reader's vote
pub async fn cast_vote(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<VoteRequest>,
) -> Result<Json<VoteSummary>, ApiError> {
    let kind: VoteKind = req.kind.parse()?;
    Ok(Json(state.site().vote(&slug, &user, kind).await?))
}

/// GET /api/blog/:slug/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    MaybeUser(viewer): MaybeUser,
) -> Result<Json<Vec<Comment>>, ApiError> {
    Ok(Json(state.site().comments(&slug, viewer.as_ref()).await?))
}

/// POST /api/blog/:slug/comments
pub async fn add_comment(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<CommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let comment = state.site().add_comment(&slug, &user, &req.content).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// PATCH /api/comments/:id
pub async fn edit_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<CommentRequest>,
) -> Result<Json<Comment>, ApiError> {
    Ok(Json(state.site().edit_comment(&id, &user, &req.content).await?))
}

/// DELETE /api/comments/:id
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode, ApiError> {
    state.site().delete_comment(&id, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/comments/:id/like - toggle
pub async fn like_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<LikeState>, ApiError> {
    Ok(Json(state.site().like_comment(&id, &user).await?))
}
