pub mod auth;
pub mod content;
pub mod social;

use axum::Json;
use serde_json::json;

use crate::error::ApiError;

/// GET /api/health
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "name": "folio",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok"
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("not found".to_string())
}
