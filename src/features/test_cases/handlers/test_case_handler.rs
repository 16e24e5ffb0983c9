use axum::{extract::Path, extract::State, http::StatusCode, Json};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::test_cases::dtos::{
    CreateTestCaseDto, TestCaseResponseDto, UpdateTestCaseDto,
};
use crate::features::test_cases::services::TestCaseService;
use crate::shared::types::{ApiResponse, Meta};

/// List the test cases of a prompt
#[utoipa::path(
    get,
    path = "/api/prompts/{name}/test-cases",
    params(
        ("name" = String, Path, description = "Prompt name")
    ),
    responses(
        (status = 200, description = "Test cases, oldest first", body = ApiResponse<Vec<TestCaseResponseDto>>),
        (status = 404, description = "Prompt not found")
    ),
    tag = "test-cases"
)]
pub async fn list_test_cases(
    State(service): State<Arc<TestCaseService>>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<Vec<TestCaseResponseDto>>>> {
    let test_cases = service.list(&name).await?;
    let total = test_cases.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(test_cases),
        None,
        Some(Meta { total }),
    )))
}

/// Add a test case to a prompt
#[utoipa::path(
    post,
    path = "/api/prompts/{name}/test-cases",
    params(
        ("name" = String, Path, description = "Prompt name")
    ),
    request_body = CreateTestCaseDto,
    responses(
        (status = 201, description = "Test case created", body = ApiResponse<TestCaseResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Prompt not found")
    ),
    tag = "test-cases"
)]
pub async fn create_test_case(
    State(service): State<Arc<TestCaseService>>,
    Path(name): Path<String>,
    AppJson(dto): AppJson<CreateTestCaseDto>,
) -> Result<(StatusCode, Json<ApiResponse<TestCaseResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let test_case = service.create(&name, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(test_case), None, None)),
    ))
}

/// Update a test case
#[utoipa::path(
    put,
    path = "/api/prompts/{name}/test-cases/{id}",
    params(
        ("name" = String, Path, description = "Prompt name"),
        ("id" = Uuid, Path, description = "Test case ID")
    ),
    request_body = UpdateTestCaseDto,
    responses(
        (status = 200, description = "Test case updated", body = ApiResponse<TestCaseResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Test case not found")
    ),
    tag = "test-cases"
)]
pub async fn update_test_case(
    State(service): State<Arc<TestCaseService>>,
    Path((name, id)): Path<(String, Uuid)>,
    AppJson(dto): AppJson<UpdateTestCaseDto>,
) -> Result<Json<ApiResponse<TestCaseResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let test_case = service.update(&name, id, dto).await?;
    Ok(Json(ApiResponse::success(Some(test_case), None, None)))
}

/// Delete a test case
#[utoipa::path(
    delete,
    path = "/api/prompts/{name}/test-cases/{id}",
    params(
        ("name" = String, Path, description = "Prompt name"),
        ("id" = Uuid, Path, description = "Test case ID")
    ),
    responses(
        (status = 200, description = "Test case deleted"),
        (status = 404, description = "Test case not found")
    ),
    tag = "test-cases"
)]
pub async fn delete_test_case(
    State(service): State<Arc<TestCaseService>>,
    Path((name, id)): Path<(String, Uuid)>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&name, id).await?;
    Ok(Json(ApiResponse::success(None, None, None)))
}
