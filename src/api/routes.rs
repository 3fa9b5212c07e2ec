use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::make_span;

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Catalog search
        .route("/search", get(handlers::search))
        .route("/games/:bg_id", get(handlers::get_game))
        // Random pick over a hydrated candidate list
        .route("/pick", post(handlers::random_pick))
        // Assistant conversations
        .route("/chat", post(handlers::chat))
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
