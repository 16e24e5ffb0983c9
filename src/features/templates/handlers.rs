use axum::Json;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::templates::dtos::{
    RenderTemplateDto, TemplatePreviewDto, TemplateVariablesDto, TemplateVariablesResponseDto,
};
use crate::shared::prompts::{render, template_variables};
use crate::shared::types::ApiResponse;

/// Render a template preview
///
/// Rendering problems (missing variables, syntax errors) are returned in the
/// preview payload rather than as an error status.
#[utoipa::path(
    post,
    path = "/api/templates/render",
    request_body = RenderTemplateDto,
    responses(
        (status = 200, description = "Preview rendered (may contain a template error)", body = ApiResponse<TemplatePreviewDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "templates"
)]
pub async fn render_template(
    AppJson(dto): AppJson<RenderTemplateDto>,
) -> Result<Json<ApiResponse<TemplatePreviewDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let preview = TemplatePreviewDto::from(render(&dto.template, &dto.variables));
    Ok(Json(ApiResponse::success(Some(preview), None, None)))
}

/// List the variables a template references
#[utoipa::path(
    post,
    path = "/api/templates/variables",
    request_body = TemplateVariablesDto,
    responses(
        (status = 200, description = "Referenced variables, sorted", body = ApiResponse<TemplateVariablesResponseDto>),
        (status = 422, description = "Template syntax error")
    ),
    tag = "templates"
)]
pub async fn list_template_variables(
    AppJson(dto): AppJson<TemplateVariablesDto>,
) -> Result<Json<ApiResponse<TemplateVariablesResponseDto>>> {
    let variables = template_variables(&dto.template)?.into_iter().collect();
    Ok(Json(ApiResponse::success(
        Some(TemplateVariablesResponseDto { variables }),
        None,
        None,
    )))
}

#[cfg(test)]
mod tests {
    use crate::features::templates::routes;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_render_preview_success() {
        let server = TestServer::new(routes::routes()).unwrap();

        let response = server
            .post("/api/templates/render")
            .json(&json!({
                "template": "Hello {{ name }}",
                "variables": { "name": "World", "extra": "x" }
            }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["rendered"], "Hello World");
        assert_eq!(body["data"]["unused_variables"], json!(["extra"]));
        assert!(body["data"]["error"].is_null());
    }

    #[tokio::test]
    async fn test_render_preview_reports_missing_variables_inline() {
        let server = TestServer::new(routes::routes()).unwrap();

        let response = server
            .post("/api/templates/render")
            .json(&json!({
                "template": "{{ a }} {{ b }}",
                "variables": { "a": "1", "tone": "formal" }
            }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert!(body["data"]["rendered"].is_null());
        assert_eq!(body["data"]["error"]["kind"], "missing_variable");
        assert_eq!(body["data"]["error"]["missing_variables"], json!(["b"]));
        assert_eq!(body["data"]["error"]["unused_variables"], json!(["tone"]));
        assert_eq!(body["data"]["unused_variables"], json!(["tone"]));
    }

    #[tokio::test]
    async fn test_variables_endpoint() {
        let server = TestServer::new(routes::routes()).unwrap();

        let response = server
            .post("/api/templates/variables")
            .json(&json!({ "template": "{% for x in items %}{{ x }}{{ sep }}{% endfor %}" }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["variables"], json!(["items", "sep"]));

        let response = server
            .post("/api/templates/variables")
            .json(&json!({ "template": "{{ oops" }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}
