//! Route table

use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{self, auth, content, social};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/home", get(content::home))
        .route("/api/projects", get(content::list_projects))
        .route("/api/projects/:slug", get(content::get_project))
        .route("/api/blog", get(content::list_posts))
        .route("/api/blog/:slug", get(content::get_post))
        .route(
            "/api/blog/:slug/votes",
            get(social::get_votes).post(social::cast_vote),
        )
        .route(
            "/api/blog/:slug/comments",
            get(social::list_comments).post(social::add_comment),
        )
        .route(
            "/api/comments/:id",
            patch(social::edit_comment).delete(social::delete_comment),
        )
        .route("/api/comments/:id/like", post(social::like_comment))
        .route("/api/publications", get(content::list_publications))
        .route("/api/publications/:slug", get(content::get_publication))
        .route("/api/about", get(content::about))
        .route("/api/tags", get(content::tags))
        .route("/api/search", get(content::search))
        .route("/auth/magic-link", post(auth::request_link))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/session", get(auth::session))
        .route("/auth/logout", post(auth::logout))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
