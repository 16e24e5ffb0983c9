use axum::{routing::post, Router};
use std::sync::Arc;

use crate::features::test_runs::{handlers, services::TestRunService};

/// Create routes for prompt test runs
pub fn routes(service: Arc<TestRunService>) -> Router {
    Router::new()
        .route("/api/test-runs", post(handlers::create_test_run))
        .with_state(service)
}
