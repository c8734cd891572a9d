//! Read-only content endpoints

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use folio_core::{BlogPost, Project, ProjectFilter, Publication, PublicationFilter, SearchQuery};
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::ApiQuery;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    tag: Option<String>,
}

// Query strings are flat; serde's `flatten` loses the typed fields below
#[derive(Debug, Default, Deserialize)]
pub struct ProjectParams {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    featured: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PublicationParams {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    kind: Option<String>,
}

fn search_query(q: Option<String>, tag: Option<String>) -> SearchQuery {
    let query = SearchQuery::new(q.unwrap_or_default());
    match tag {
        Some(tag) => query.with_tag(tag),
        None => query,
    }
}

/// GET /api/home
pub async fn home(State(state): State<AppState>) -> Response {
    Json(state.site().home()).into_response()
}

/// GET /api/blog
pub async fn list_posts(State(state): State<AppState>, ApiQuery(params): ApiQuery<ListParams>) -> Json<Vec<BlogPost>> {
    let posts = search_query(params.q, params.tag).filter(state.site().catalog().posts());
    Json(posts.into_iter().cloned().collect())
}

/// GET /api/blog/:slug
pub async fn get_post(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<BlogPost>, ApiError> {
    state
        .site()
        .catalog()
        .post(&slug)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Post '{}' not found", slug)))
}

/// GET /api/projects
pub async fn list_projects(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ProjectParams>,
) -> Json<Vec<Project>> {
    let filter = ProjectFilter {
        query: search_query(params.q, params.tag),
        status: params.status,
        featured: params.featured,
    };
    Json(filter.apply(state.site().catalog().projects()).into_iter().cloned().collect())
}

/// GET /api/projects/:slug
pub async fn get_project(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<Project>, ApiError> {
    state
        .site()
        .catalog()
        .project(&slug)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Project '{}' not found", slug)))
}

/// GET /api/publications
pub async fn list_publications(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PublicationParams>,
) -> Json<Vec<Publication>> {
    let filter = PublicationFilter {
        query: search_query(params.q, params.tag),
        year: params.year,
        kind: params.kind,
    };
    Json(filter.apply(state.site().catalog().publications()).into_iter().cloned().collect())
}

/// GET /api/publications/:slug
pub async fn get_publication(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Publication>, ApiError> {
    state
        .site()
        .catalog()
        .publication(&slug)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Publication '{}' not found", slug)))
}

/// GET /api/about
pub async fn about(State(state): State<AppState>) -> Response {
    match state.site().catalog().about() {
        Some(about) => Json(about).into_response(),
        None => ApiError::NotFound("About page not found".to_string()).into_response(),
    }
}

/// GET /api/tags
pub async fn tags(State(state): State<AppState>) -> Response {
    Json(state.site().catalog().tags()).into_response()
}

/// GET /api/search?q=
pub async fn search(State(state): State<AppState>, ApiQuery(params): ApiQuery<ListParams>) -> Response {
    let hits = state.site().catalog().search(&search_query(params.q, params.tag));
    Json(hits).into_response()
}
