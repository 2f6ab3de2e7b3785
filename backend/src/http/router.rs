//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS: the dashboard front end is served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Weeks and alignment
        .route("/weeks", get(handlers::list_weeks))
        .route("/weeks/{week_id}/blocks", get(handlers::get_week_blocks))
        // Futures catalog
        .route("/contracts/forward", get(handlers::get_forward_contracts))
        .route("/products", get(handlers::list_products))
        // Routed dashboard / product detail payload
        .route("/view", get(handlers::get_view));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        // Read-only API: request bodies are never expected.
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
