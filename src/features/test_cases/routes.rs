use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::features::test_cases::{handlers, services::TestCaseService};

/// Create routes for prompt test cases
pub fn routes(service: Arc<TestCaseService>) -> Router {
    Router::new()
        .route(
            "/api/prompts/{name}/test-cases",
            get(handlers::list_test_cases).post(handlers::create_test_case),
        )
        .route(
            "/api/prompts/{name}/test-cases/{id}",
            put(handlers::update_test_case).delete(handlers::delete_test_case),
        )
        .with_state(service)
}
