use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request DTO for adding a test case to a prompt
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTestCaseDto {
    /// Value for each template variable
    #[serde(default)]
    pub input_values: BTreeMap<String, String>,

    #[serde(default)]
    #[validate(length(max = 20000, message = "Expected output must not exceed 20000 characters"))]
    pub expected_output: String,
}

/// Request DTO for updating a test case; omitted fields are left unchanged
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateTestCaseDto {
    pub input_values: Option<BTreeMap<String, String>>,

    #[validate(length(max = 20000, message = "Expected output must not exceed 20000 characters"))]
    pub expected_output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestCaseResponseDto {
    pub id: Uuid,
    pub prompt_name: String,
    pub input_values: BTreeMap<String, String>,
    pub expected_output: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
