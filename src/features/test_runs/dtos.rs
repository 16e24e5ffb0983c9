use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::test_runs::services::EndpointResult;

/// Request DTO for testing a prompt version against endpoints
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTestRunDto {
    #[validate(length(min = 1, max = 200))]
    pub prompt_name: String,

    /// Version to test; the latest when omitted
    #[validate(range(min = 1))]
    pub version: Option<i64>,

    /// Variable values; strings, numbers, lists and objects are all accepted.
    /// When omitted, the test case inputs are used if a test case is given,
    /// otherwise the version's example values.
    #[schema(value_type = Option<Object>)]
    pub variables: Option<BTreeMap<String, serde_json::Value>>,

    pub test_case_id: Option<Uuid>,

    /// Names of the endpoints to call (1 to 5)
    pub endpoints: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TestRunResponseDto {
    pub prompt_name: String,
    pub version_number: i64,
    pub rendered_prompt: String,
    /// Supplied variables the template never references
    pub unused_variables: Vec<String>,
    /// Expected output of the referenced test case, if any
    pub expected_output: Option<String>,
    /// One result per endpoint, ordered by endpoint name
    pub results: Vec<EndpointResult>,
}
