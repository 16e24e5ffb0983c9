use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::features::test_cases::dtos::TestCaseResponseDto;

/// Database model for a prompt test case
#[derive(Debug, Clone, FromRow)]
pub struct TestCase {
    pub id: Uuid,
    pub prompt_name: String,
    pub input_values: Json<BTreeMap<String, String>>,
    pub expected_output: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TestCase> for TestCaseResponseDto {
    fn from(t: TestCase) -> Self {
        Self {
            id: t.id,
            prompt_name: t.prompt_name,
            input_values: t.input_values.0,
            expected_output: t.expected_output,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}
