//! HTTP route handlers for the order counter.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                   - Display page (flip counter)
//! GET  /api/orders/count   - Order count for ?period=<period> (default all-time)
//! GET  /health             - Liveness and configuration status
//! GET  /config/check       - Required configuration report
//! GET  /static/*           - Display page assets
//! ```
//!
//! Unknown paths answer with a JSON 404.

pub mod health;
pub mod home;
pub mod orders;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::from_fn,
    routing::get,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::middleware::{cors_layer, request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create the API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/orders/count", get(orders::count))
}

/// Create all routes for the order counter.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Display page
        .route("/", get(home::index))
        // Probes
        .route("/health", get(health::health))
        .route("/config/check", get(health::config_check))
        // JSON API
        .nest("/api", api_routes())
        .fallback(not_found)
}

/// Build the complete application: routes, static assets and middleware.
///
/// Sentry layers are added by the binary on top of this.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(state.config());
    let static_dir = state.config().static_dir.clone();

    Router::new()
        .merge(routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .layer(cors)
}

/// Fallback for unknown paths.
async fn not_found() -> AppError {
    AppError::NotFound("Endpoint not found".to_string())
}
