//! API Route Configuration

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{self, AppState};
use super::middleware::{api_key_middleware, logging_middleware, rate_limit_middleware};

/// Create the API router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Health & metadata
        .route("/health", get(handlers::health_check))
        .route("/supported-tlds", get(handlers::supported_tlds))
        // Analysis
        .route("/analyze", post(handlers::analyze_domain))
        .route("/analyze-batch", post(handlers::analyze_batch))
        .route("/compare", post(handlers::compare_domains))
        .route("/activities/:domain", get(handlers::get_activities))
        .route("/quick-score/:domain", get(handlers::get_quick_score));

    Router::new()
        .nest("/api", api)
        .fallback(handlers::not_found)
        .with_state(state.clone())
        // Middleware (order matters - bottom runs first)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn_with_state(state, rate_limit_middleware))
        .layer(middleware::from_fn(api_key_middleware))
        // Outermost, so 429s and preflights carry CORS headers too
        .layer(cors)
}
