use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::prompts::models::{NewPromptVersion, PromptVersion};
use crate::features::templates::dtos::TemplatePreviewDto;
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::shared::prompts::template_variables;

// Helper functions for defaults
fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

// Query params for browsing prompts
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct PromptQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    /// Case-insensitive search in prompt name and latest template text
    pub search: Option<String>,
}

impl Default for PromptQueryParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            search: None,
        }
    }
}

impl PromptQueryParams {
    /// Rows to skip; saturates instead of overflowing on huge page numbers
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.limit())
    }

    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

// Create request: saves a new version (version 1 for an unknown name)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePromptVersionDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 200))]
    pub author: String,

    #[validate(length(min = 1))]
    pub template: String,

    /// Example value for each template variable, used for the preview
    #[serde(default)]
    pub example_values: BTreeMap<String, String>,
}

impl From<CreatePromptVersionDto> for NewPromptVersion {
    fn from(dto: CreatePromptVersionDto) -> Self {
        Self {
            name: dto.name,
            author: dto.author,
            template: dto.template,
            example_values: dto.example_values,
        }
    }
}

// Response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PromptVersionResponseDto {
    pub id: Uuid,
    pub prompt_name: String,
    pub version_number: i64,
    pub author: String,
    pub template: String,
    pub example_values: BTreeMap<String, String>,
    /// Variables referenced by the template, sorted
    pub variables: Vec<String>,
    pub upvote_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<PromptVersion> for PromptVersionResponseDto {
    fn from(p: PromptVersion) -> Self {
        // Stored templates always compiled at save time
        let variables = template_variables(&p.template)
            .map(|names| names.into_iter().collect())
            .unwrap_or_default();

        Self {
            id: p.id,
            prompt_name: p.prompt_name,
            version_number: p.version_number,
            author: p.author,
            template: p.template,
            example_values: p.example_values.0,
            variables,
            upvote_count: p.upvote_count,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePromptVersionResponseDto {
    pub version: PromptVersionResponseDto,
    /// The template rendered with its example values
    pub preview: TemplatePreviewDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpvoteResponseDto {
    pub prompt_name: String,
    pub version_number: i64,
    pub upvote_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_clamp() {
        let params = PromptQueryParams {
            page: 0,
            page_size: 1000,
            search: None,
        };
        assert_eq!(params.limit(), MAX_PAGE_SIZE);
        assert_eq!(params.offset(), 0);

        let params = PromptQueryParams {
            page: 3,
            page_size: 20,
            search: None,
        };
        assert_eq!(params.offset(), 40);

        let params = PromptQueryParams {
            page: i64::MAX,
            page_size: 10,
            search: None,
        };
        assert_eq!(params.offset(), i64::MAX);
    }

    #[test]
    fn test_create_dto_validation() {
        let dto = CreatePromptVersionDto {
            name: String::new(),
            author: "ana".to_string(),
            template: "Hi".to_string(),
            example_values: BTreeMap::new(),
        };
        assert!(dto.validate().is_err());

        let dto = CreatePromptVersionDto {
            name: "greeting".to_string(),
            author: String::new(),
            template: "Hi".to_string(),
            example_values: BTreeMap::new(),
        };
        assert!(dto.validate().is_ok());
    }
}
