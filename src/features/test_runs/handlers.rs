use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::test_runs::dtos::{CreateTestRunDto, TestRunResponseDto};
use crate::features::test_runs::services::TestRunService;
use crate::shared::types::ApiResponse;

/// Test a prompt version against endpoints
///
/// Endpoint failures (timeouts, connection errors, non-2xx statuses) are
/// reported per endpoint in the results and never fail the request.
#[utoipa::path(
    post,
    path = "/api/test-runs",
    request_body = CreateTestRunDto,
    responses(
        (status = 200, description = "One result per selected endpoint", body = ApiResponse<TestRunResponseDto>),
        (status = 400, description = "Invalid endpoint selection"),
        (status = 404, description = "Prompt, version, test case or endpoint not found"),
        (status = 422, description = "Template could not be rendered")
    ),
    tag = "test-runs"
)]
pub async fn create_test_run(
    State(service): State<Arc<TestRunService>>,
    AppJson(dto): AppJson<CreateTestRunDto>,
) -> Result<Json<ApiResponse<TestRunResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let run = service.run_prompt_test(dto).await?;
    let failed = run.results.iter().filter(|r| !r.is_ok()).count();
    let message = format!(
        "{} of {} endpoint(s) responded",
        run.results.len() - failed,
        run.results.len()
    );

    Ok(Json(ApiResponse::success(Some(run), Some(message), None)))
}

#[cfg(test)]
mod tests {
    use crate::features::endpoints::EndpointRegistry;
    use crate::features::prompts::{models::NewPromptVersion, PromptService};
    use crate::features::test_cases::TestCaseService;
    use crate::features::test_runs::services::test_runner::tests::{
        descriptor, echo_app, failing_app, spawn_endpoint,
    };
    use crate::features::test_runs::{routes, TestRunService, TestRunner};
    use crate::shared::test_helpers::test_pool;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;

    async fn server() -> TestServer {
        let pool = test_pool().await;
        let prompts = Arc::new(PromptService::new(pool.clone()));
        prompts
            .create_version(NewPromptVersion {
                name: "haiku".to_string(),
                template: "Write a haiku about {{ topic }}".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let test_cases = Arc::new(TestCaseService::new(pool, prompts.clone()));

        let registry = EndpointRegistry::new(vec![
            descriptor("good", spawn_endpoint(echo_app()).await),
            descriptor("bad", spawn_endpoint(failing_app()).await),
        ])
        .unwrap();
        let runner = Arc::new(TestRunner::new(Arc::new(registry), Duration::from_secs(5)).unwrap());

        let service = Arc::new(TestRunService::new(prompts, test_cases, runner));
        TestServer::new(routes::routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_run_reports_each_endpoint() {
        let server = server().await;

        let response = server
            .post("/api/test-runs")
            .json(&json!({
                "prompt_name": "haiku",
                "variables": { "topic": "autumn" },
                "endpoints": ["good", "bad"]
            }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "1 of 2 endpoint(s) responded");
        assert_eq!(body["data"]["rendered_prompt"], "Write a haiku about autumn");

        let results = body["data"]["results"].as_array().unwrap();
        assert_eq!(results[0]["endpoint_name"], "bad");
        assert_eq!(results[0]["error"]["kind"], "http");
        assert_eq!(results[0]["error"]["status"], 500);
        assert_eq!(results[1]["endpoint_name"], "good");
        assert_eq!(
            results[1]["response"],
            "good-model says: Write a haiku about autumn"
        );
    }

    #[tokio::test]
    async fn test_run_with_missing_variable_is_422() {
        let server = server().await;

        let response = server
            .post("/api/test-runs")
            .json(&json!({ "prompt_name": "haiku", "endpoints": ["good"] }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert_eq!(body["errors"][0], "Missing value for variable 'topic'");
    }

    #[tokio::test]
    async fn test_run_rejects_bad_selection() {
        let server = server().await;

        server
            .post("/api/test-runs")
            .json(&json!({
                "prompt_name": "haiku",
                "variables": { "topic": "x" },
                "endpoints": []
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
