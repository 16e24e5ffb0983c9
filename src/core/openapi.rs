use utoipa::{Modify, OpenApi};

use crate::features::endpoints::{handlers as endpoints_handlers, EndpointDescriptor};
use crate::features::prompts::{dtos as prompts_dtos, handlers as prompts_handlers};
use crate::features::templates::{dtos as templates_dtos, handlers as templates_handlers};
use crate::features::test_cases::{dtos as test_cases_dtos, handlers as test_cases_handlers};
use crate::features::test_runs::{
    dtos as test_runs_dtos, handlers as test_runs_handlers, services as test_runs_services,
};
use crate::shared::prompts::TemplateErrorKind;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Prompts
        prompts_handlers::create_prompt_version,
        prompts_handlers::list_prompts,
        prompts_handlers::get_latest_version,
        prompts_handlers::list_prompt_versions,
        prompts_handlers::get_prompt_version,
        prompts_handlers::upvote_prompt_version,
        // Test cases
        test_cases_handlers::list_test_cases,
        test_cases_handlers::create_test_case,
        test_cases_handlers::update_test_case,
        test_cases_handlers::delete_test_case,
        // Endpoints
        endpoints_handlers::list_endpoints,
        endpoints_handlers::get_endpoint,
        // Templates
        templates_handlers::render_template,
        templates_handlers::list_template_variables,
        // Test runs
        test_runs_handlers::create_test_run,
    ),
    components(
        schemas(
            Meta,
            // Prompts
            prompts_dtos::PromptQueryParams,
            prompts_dtos::CreatePromptVersionDto,
            prompts_dtos::PromptVersionResponseDto,
            prompts_dtos::CreatePromptVersionResponseDto,
            prompts_dtos::UpvoteResponseDto,
            ApiResponse<prompts_dtos::PromptVersionResponseDto>,
            ApiResponse<Vec<prompts_dtos::PromptVersionResponseDto>>,
            ApiResponse<prompts_dtos::CreatePromptVersionResponseDto>,
            ApiResponse<prompts_dtos::UpvoteResponseDto>,
            // Test cases
            test_cases_dtos::CreateTestCaseDto,
            test_cases_dtos::UpdateTestCaseDto,
            test_cases_dtos::TestCaseResponseDto,
            ApiResponse<test_cases_dtos::TestCaseResponseDto>,
            ApiResponse<Vec<test_cases_dtos::TestCaseResponseDto>>,
            // Endpoints
            EndpointDescriptor,
            ApiResponse<EndpointDescriptor>,
            ApiResponse<Vec<EndpointDescriptor>>,
            // Templates
            TemplateErrorKind,
            templates_dtos::TemplateErrorDto,
            templates_dtos::TemplatePreviewDto,
            templates_dtos::RenderTemplateDto,
            templates_dtos::TemplateVariablesDto,
            templates_dtos::TemplateVariablesResponseDto,
            ApiResponse<templates_dtos::TemplatePreviewDto>,
            ApiResponse<templates_dtos::TemplateVariablesResponseDto>,
            // Test runs
            test_runs_dtos::CreateTestRunDto,
            test_runs_dtos::TestRunResponseDto,
            test_runs_services::EndpointError,
            test_runs_services::EndpointResult,
            ApiResponse<test_runs_dtos::TestRunResponseDto>,
        )
    ),
    tags(
        (name = "prompts", description = "Versioned prompt library"),
        (name = "test-cases", description = "Saved inputs and expected outputs per prompt"),
        (name = "endpoints", description = "Configured LLM endpoints"),
        (name = "templates", description = "Template preview and variable discovery"),
        (name = "test-runs", description = "Send rendered prompts to LLM endpoints"),
    ),
    info(
        title = "Prompt Library API",
        version = "0.1.0",
        description = "API documentation for the prompt library",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/api/prompts",
            "/api/prompts/{name}/latest",
            "/api/prompts/{name}/versions/{version}/upvote",
            "/api/prompts/{name}/test-cases/{id}",
            "/api/endpoints/{name}",
            "/api/templates/render",
            "/api/test-runs",
        ] {
            assert!(paths.contains(&expected), "missing path {}", expected);
        }
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Custom".to_string(),
            version: "9.9.9".to_string(),
            description: "Custom docs".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Custom");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
