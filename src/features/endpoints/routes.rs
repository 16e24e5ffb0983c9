use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::endpoints::{handlers, EndpointRegistry};

/// Create routes for the endpoint registry
pub fn routes(registry: Arc<EndpointRegistry>) -> Router {
    Router::new()
        .route("/api/endpoints", get(handlers::list_endpoints))
        .route("/api/endpoints/{name}", get(handlers::get_endpoint))
        .with_state(registry)
}
