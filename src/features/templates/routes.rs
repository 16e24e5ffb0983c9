use axum::{routing::post, Router};

use crate::features::templates::handlers;

/// Create routes for the templates feature (stateless)
pub fn routes() -> Router {
    Router::new()
        .route("/api/templates/render", post(handlers::render_template))
        .route(
            "/api/templates/variables",
            post(handlers::list_template_variables),
        )
}
