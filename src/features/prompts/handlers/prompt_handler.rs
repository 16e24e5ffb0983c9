use axum::{extract::Path, extract::Query, extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::prompts::dtos::{
    CreatePromptVersionDto, CreatePromptVersionResponseDto, PromptQueryParams,
    PromptVersionResponseDto, UpvoteResponseDto,
};
use crate::features::prompts::services::PromptService;
use crate::features::templates::dtos::TemplatePreviewDto;
use crate::shared::prompts::render;
use crate::shared::types::{ApiResponse, Meta};

/// Save a new prompt version
///
/// Creates version 1 for a new name, otherwise the next version number.
/// The response carries a preview render using the example values; a
/// preview failure does not prevent the save.
#[utoipa::path(
    post,
    path = "/api/prompts",
    request_body = CreatePromptVersionDto,
    responses(
        (status = 201, description = "Prompt version created", body = ApiResponse<CreatePromptVersionResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "prompts"
)]
pub async fn create_prompt_version(
    State(service): State<Arc<PromptService>>,
    AppJson(dto): AppJson<CreatePromptVersionDto>,
) -> Result<(StatusCode, Json<ApiResponse<CreatePromptVersionResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let version = service.create_version(dto.into()).await?;
    let preview = TemplatePreviewDto::from(render(&version.template, &version.example_values.0));

    let message = format!(
        "Saved '{}' as version {}",
        version.prompt_name, version.version_number
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(CreatePromptVersionResponseDto {
                version: version.into(),
                preview,
            }),
            Some(message),
            None,
        )),
    ))
}

/// Browse prompts (latest version of each, ordered by name)
#[utoipa::path(
    get,
    path = "/api/prompts",
    params(PromptQueryParams),
    responses(
        (status = 200, description = "Prompts retrieved successfully", body = ApiResponse<Vec<PromptVersionResponseDto>>)
    ),
    tag = "prompts"
)]
pub async fn list_prompts(
    State(service): State<Arc<PromptService>>,
    Query(params): Query<PromptQueryParams>,
) -> Result<Json<ApiResponse<Vec<PromptVersionResponseDto>>>> {
    let (prompts, total) = service.browse(&params).await?;
    Ok(Json(ApiResponse::success(
        Some(prompts),
        None,
        Some(Meta { total }),
    )))
}

/// Get the latest version of a prompt
#[utoipa::path(
    get,
    path = "/api/prompts/{name}/latest",
    params(
        ("name" = String, Path, description = "Prompt name")
    ),
    responses(
        (status = 200, description = "Latest version", body = ApiResponse<PromptVersionResponseDto>),
        (status = 404, description = "Prompt not found")
    ),
    tag = "prompts"
)]
pub async fn get_latest_version(
    State(service): State<Arc<PromptService>>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<PromptVersionResponseDto>>> {
    let version = service.get_latest(&name).await?;
    Ok(Json(ApiResponse::success(Some(version.into()), None, None)))
}

/// List every version of a prompt, oldest first
#[utoipa::path(
    get,
    path = "/api/prompts/{name}/versions",
    params(
        ("name" = String, Path, description = "Prompt name")
    ),
    responses(
        (status = 200, description = "Version history", body = ApiResponse<Vec<PromptVersionResponseDto>>),
        (status = 404, description = "Prompt not found")
    ),
    tag = "prompts"
)]
pub async fn list_prompt_versions(
    State(service): State<Arc<PromptService>>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<Vec<PromptVersionResponseDto>>>> {
    let versions = service.list_versions(&name).await?;
    if versions.is_empty() {
        return Err(AppError::NotFound(format!(
            "Prompt '{}' not found",
            name.trim()
        )));
    }

    let total = versions.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(versions.into_iter().map(Into::into).collect()),
        None,
        Some(Meta { total }),
    )))
}

/// Get one version of a prompt
#[utoipa::path(
    get,
    path = "/api/prompts/{name}/versions/{version}",
    params(
        ("name" = String, Path, description = "Prompt name"),
        ("version" = i64, Path, description = "Version number")
    ),
    responses(
        (status = 200, description = "Prompt version", body = ApiResponse<PromptVersionResponseDto>),
        (status = 404, description = "Version not found")
    ),
    tag = "prompts"
)]
pub async fn get_prompt_version(
    State(service): State<Arc<PromptService>>,
    Path((name, version)): Path<(String, i64)>,
) -> Result<Json<ApiResponse<PromptVersionResponseDto>>> {
    let version = service.get_version(&name, version).await?;
    Ok(Json(ApiResponse::success(Some(version.into()), None, None)))
}

/// Upvote one version of a prompt
#[utoipa::path(
    post,
    path = "/api/prompts/{name}/versions/{version}/upvote",
    params(
        ("name" = String, Path, description = "Prompt name"),
        ("version" = i64, Path, description = "Version number")
    ),
    responses(
        (status = 200, description = "Upvote recorded", body = ApiResponse<UpvoteResponseDto>),
        (status = 404, description = "Version not found")
    ),
    tag = "prompts"
)]
pub async fn upvote_prompt_version(
    State(service): State<Arc<PromptService>>,
    Path((name, version)): Path<(String, i64)>,
) -> Result<Json<ApiResponse<UpvoteResponseDto>>> {
    let upvote_count = service.upvote(&name, version).await?;
    Ok(Json(ApiResponse::success(
        Some(UpvoteResponseDto {
            prompt_name: name.trim().to_string(),
            version_number: version,
            upvote_count,
        }),
        None,
        None,
    )))
}
