use super::{AppState, handlers};
use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds and returns the full Axum router with all routes and shared state.
pub fn build(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/funding-rate", get(handlers::get_funding_rates))
        .route("/api/arbitrage", get(handlers::get_arbitrage))
        .route("/api/overview", get(handlers::get_overview))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // dashboard is served from its own origin
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
