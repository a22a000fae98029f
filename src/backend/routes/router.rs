/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. Health check
 * 2. Authentication routes
 * 3. Feedback routes
 * 4. JSON 404 fallback
 *
 * Every request passes through `tower_http`'s `TraceLayer`.
 */

use axum::{response::Json, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::{configure_auth_routes, configure_feedback_routes};
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Settings, services and the store
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/health", get(health));

    let router = configure_auth_routes(router);
    let router = configure_feedback_routes(router);

    router
        .fallback(|| async { BackendError::not_found("Not found") })
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Liveness probe
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
