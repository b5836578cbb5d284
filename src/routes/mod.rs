// ============================================================================
// HTTP Surface
// ============================================================================
//
// Router assembly:
// - GET /health is answered locally
// - every other path falls through to the gateway dispatcher
//
// Structure:
// - mod.rs: router assembly and middleware stack
// - health.rs: liveness endpoint
// - middleware.rs: request logging
//
// ============================================================================

mod health;
mod middleware;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::gateway::router::route_request;

/// Create the application router: health endpoint, dispatcher fallback,
/// and the middleware stack.
pub fn create_router(context: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        // Everything that is not /health goes through the dispatcher
        .fallback(route_request)
        .layer(
            ServiceBuilder::new()
                // Tracing layer (outermost - runs first)
                .layer(TraceLayer::new_for_http())
                // Request logging
                .layer(axum::middleware::from_fn(middleware::request_logging))
                .into_inner(),
        )
        .with_state(context)
}
