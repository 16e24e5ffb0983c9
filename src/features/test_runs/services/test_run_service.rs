use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::prompts::PromptService;
use crate::features::test_cases::TestCaseService;
use crate::features::test_runs::dtos::{CreateTestRunDto, TestRunResponseDto};
use crate::features::test_runs::services::TestRunner;
use crate::shared::prompts::render;

fn string_values(values: &BTreeMap<String, String>) -> BTreeMap<String, Value> {
    values
        .iter()
        .map(|(name, value)| (name.clone(), Value::String(value.clone())))
        .collect()
}

/// Renders a stored prompt version and sends it to the selected endpoints
pub struct TestRunService {
    prompts: Arc<PromptService>,
    test_cases: Arc<TestCaseService>,
    runner: Arc<TestRunner>,
}

impl TestRunService {
    pub fn new(
        prompts: Arc<PromptService>,
        test_cases: Arc<TestCaseService>,
        runner: Arc<TestRunner>,
    ) -> Self {
        Self {
            prompts,
            test_cases,
            runner,
        }
    }

    pub async fn run_prompt_test(&self, dto: CreateTestRunDto) -> Result<TestRunResponseDto> {
        // Fail fast on a bad selection before touching the database
        let endpoints = self.runner.select_endpoints(&dto.endpoints)?;

        let version = match dto.version {
            Some(number) => self.prompts.get_version(&dto.prompt_name, number).await?,
            None => self.prompts.get_latest(&dto.prompt_name).await?,
        };

        let test_case = match dto.test_case_id {
            Some(id) => Some(self.test_cases.get(&version.prompt_name, id).await?),
            None => None,
        };

        let variables: BTreeMap<String, Value> = match (dto.variables, &test_case) {
            (Some(variables), _) => variables,
            (None, Some(case)) => string_values(&case.input_values),
            (None, None) => string_values(&version.example_values.0),
        };

        let rendered = render(&version.template, &variables)?;

        tracing::info!(
            "Testing prompt '{}' v{} against {:?}",
            version.prompt_name,
            version.version_number,
            dto.endpoints
        );

        let results = self.runner.run_test(&rendered.text, &endpoints).await?;

        Ok(TestRunResponseDto {
            prompt_name: version.prompt_name,
            version_number: version.version_number,
            rendered_prompt: rendered.text,
            unused_variables: rendered.unused_variables,
            expected_output: test_case.map(|case| case.expected_output),
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::features::endpoints::EndpointRegistry;
    use crate::features::prompts::models::NewPromptVersion;
    use crate::features::test_cases::dtos::CreateTestCaseDto;
    use crate::features::test_runs::services::test_runner::tests::{
        descriptor, echo_app, spawn_endpoint,
    };
    use crate::shared::prompts::TemplateError;
    use crate::shared::test_helpers::test_pool;
    use std::time::Duration;

    async fn setup() -> (TestRunService, Arc<TestCaseService>) {
        let pool = test_pool().await;
        let prompts = Arc::new(PromptService::new(pool.clone()));
        prompts
            .create_version(NewPromptVersion {
                name: "greeting".to_string(),
                author: "ana".to_string(),
                template: "Hello {{ name }}".to_string(),
                example_values: BTreeMap::from([("name".to_string(), "World".to_string())]),
            })
            .await
            .unwrap();
        prompts
            .create_version(NewPromptVersion {
                name: "greeting".to_string(),
                template: "Hi {{ name }}, welcome to {{ place }}".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        prompts
            .create_version(NewPromptVersion {
                name: "checklist".to_string(),
                template: "{% for item in items %}- {{ item }}\n{% endfor %}".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let test_cases = Arc::new(TestCaseService::new(pool, prompts.clone()));
        let registry = EndpointRegistry::new(vec![descriptor(
            "echo",
            spawn_endpoint(echo_app()).await,
        )])
        .unwrap();
        let runner = Arc::new(TestRunner::new(Arc::new(registry), Duration::from_secs(5)).unwrap());

        (
            TestRunService::new(prompts, test_cases.clone(), runner),
            test_cases,
        )
    }

    fn request(version: Option<i64>) -> CreateTestRunDto {
        CreateTestRunDto {
            prompt_name: "greeting".to_string(),
            version,
            variables: None,
            test_case_id: None,
            endpoints: vec!["echo".to_string()],
        }
    }

    #[tokio::test]
    async fn test_runs_version_with_example_values() {
        let (service, _) = setup().await;

        let run = service.run_prompt_test(request(Some(1))).await.unwrap();

        assert_eq!(run.rendered_prompt, "Hello World");
        assert_eq!(run.results.len(), 1);
        assert_eq!(
            run.results[0].response.as_deref(),
            Some("echo-model says: Hello World")
        );
        assert!(run.expected_output.is_none());
    }

    #[tokio::test]
    async fn test_latest_version_without_values_is_a_template_error() {
        let (service, _) = setup().await;

        let err = service.run_prompt_test(request(None)).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Template(TemplateError::MissingVariable { ref missing, .. })
                if missing == &vec!["name".to_string(), "place".to_string()]
        ));
    }

    #[tokio::test]
    async fn test_request_variables_may_be_lists() {
        let (service, _) = setup().await;

        let mut dto = request(None);
        dto.prompt_name = "checklist".to_string();
        dto.variables = Some(BTreeMap::from([(
            "items".to_string(),
            serde_json::json!(["milk", "eggs"]),
        )]));
        let run = service.run_prompt_test(dto).await.unwrap();

        assert_eq!(run.rendered_prompt, "- milk\n- eggs\n");
        assert!(run.results[0].is_ok());
    }

    #[tokio::test]
    async fn test_uses_test_case_inputs_and_echoes_expected_output() {
        let (service, test_cases) = setup().await;
        let case = test_cases
            .create(
                "greeting",
                CreateTestCaseDto {
                    input_values: BTreeMap::from([
                        ("name".to_string(), "Ada".to_string()),
                        ("place".to_string(), "Paris".to_string()),
                    ]),
                    expected_output: "A friendly greeting".to_string(),
                },
            )
            .await
            .unwrap();

        let mut dto = request(None);
        dto.test_case_id = Some(case.id);
        let run = service.run_prompt_test(dto).await.unwrap();

        assert_eq!(run.version_number, 2);
        assert_eq!(run.rendered_prompt, "Hi Ada, welcome to Paris");
        assert_eq!(run.expected_output.as_deref(), Some("A friendly greeting"));
    }

    #[tokio::test]
    async fn test_unknown_prompt_or_endpoint() {
        let (service, _) = setup().await;

        let mut dto = request(None);
        dto.prompt_name = "ghost".to_string();
        assert!(matches!(
            service.run_prompt_test(dto).await,
            Err(AppError::NotFound(_))
        ));

        let mut dto = request(Some(1));
        dto.endpoints = vec!["missing".to_string()];
        assert!(matches!(
            service.run_prompt_test(dto).await,
            Err(AppError::NotFound(_))
        ));
    }
}
