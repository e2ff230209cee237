use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Navigation target produced by search submission
        .route("/search-results", get(handlers::search_results))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Feeds
        .route("/home", get(handlers::home))
        .route("/feeds/:category", get(handlers::feed_page))
        // Categories
        .route("/categories", get(handlers::get_categories))
        .route("/categories/:category/name", get(handlers::get_category_name))
        // Recommendations
        .route("/recommendations", post(handlers::recommendations))
        // Search
        .route("/search", post(handlers::submit_search))
}
