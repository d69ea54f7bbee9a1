//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Draft pipeline
        .route(
            "/conversations/{id}/drafts",
            post(handlers::draft::submit_draft).get(handlers::draft::list_drafts),
        )
        .route("/drafts/{id}", get(handlers::draft::get_draft))
        .route("/drafts/{id}/approve", post(handlers::draft::approve_draft))
        .route("/drafts/{id}/reject", post(handlers::draft::reject_draft))
        .route("/drafts/{id}/promote", post(handlers::draft::promote_draft))
        // Version ledger
        .route(
            "/conversations/{id}/files",
            post(handlers::version::record_file).get(handlers::version::get_snapshot),
        )
        .route(
            "/conversations/{id}/files/{filename}/history",
            get(handlers::version::get_history),
        )
        // Commit orchestration
        .route(
            "/conversations/{id}/commit",
            post(handlers::commit::commit_snapshot),
        )
        .route(
            "/conversations/{id}/commits",
            get(handlers::commit::list_commits),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
