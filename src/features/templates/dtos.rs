use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use validator::Validate;

use crate::shared::prompts::{RenderedPrompt, TemplateError, TemplateErrorKind};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TemplateErrorDto {
    pub kind: TemplateErrorKind,
    pub detail: String,
    pub missing_variables: Vec<String>,
    /// Supplied variables the template never references (warnings)
    pub unused_variables: Vec<String>,
}

impl From<&TemplateError> for TemplateErrorDto {
    fn from(err: &TemplateError) -> Self {
        Self {
            kind: err.kind(),
            detail: err.detail(),
            missing_variables: err.missing_variables().to_vec(),
            unused_variables: err.unused_variables().to_vec(),
        }
    }
}

/// Result of a preview render. Exactly one of `rendered` and `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TemplatePreviewDto {
    pub rendered: Option<String>,
    /// Supplied variables the template never references
    pub unused_variables: Vec<String>,
    pub error: Option<TemplateErrorDto>,
}

impl From<std::result::Result<RenderedPrompt, TemplateError>> for TemplatePreviewDto {
    fn from(result: std::result::Result<RenderedPrompt, TemplateError>) -> Self {
        match result {
            Ok(rendered) => Self {
                rendered: Some(rendered.text),
                unused_variables: rendered.unused_variables,
                error: None,
            },
            Err(err) => Self {
                rendered: None,
                unused_variables: err.unused_variables().to_vec(),
                error: Some(TemplateErrorDto::from(&err)),
            },
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RenderTemplateDto {
    #[validate(length(min = 1))]
    pub template: String,

    /// Variable values; strings, numbers, lists and objects are all accepted
    #[serde(default)]
    #[schema(value_type = Object)]
    pub variables: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TemplateVariablesDto {
    pub template: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TemplateVariablesResponseDto {
    pub variables: Vec<String>,
}
