use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::prompts::{handlers, services::PromptService};

/// Create routes for prompt storage and browsing
pub fn routes(service: Arc<PromptService>) -> Router {
    Router::new()
        .route(
            "/api/prompts",
            post(handlers::create_prompt_version).get(handlers::list_prompts),
        )
        .route("/api/prompts/{name}/latest", get(handlers::get_latest_version))
        .route(
            "/api/prompts/{name}/versions",
            get(handlers::list_prompt_versions),
        )
        .route(
            "/api/prompts/{name}/versions/{version}",
            get(handlers::get_prompt_version),
        )
        .route(
            "/api/prompts/{name}/versions/{version}/upvote",
            post(handlers::upvote_prompt_version),
        )
        .with_state(service)
}
