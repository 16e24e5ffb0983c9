use chrono::Utc;
use sqlx::types::Json;
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::prompts::PromptService;
use crate::features::test_cases::dtos::{
    CreateTestCaseDto, TestCaseResponseDto, UpdateTestCaseDto,
};
use crate::features::test_cases::models::TestCase;

const TEST_CASE_COLUMNS: &str =
    "id, prompt_name, input_values, expected_output, created_at, updated_at";

/// Service for managing the saved test cases of a prompt
pub struct TestCaseService {
    pool: SqlitePool,
    prompts: Arc<PromptService>,
}

impl TestCaseService {
    pub fn new(pool: SqlitePool, prompts: Arc<PromptService>) -> Self {
        Self { pool, prompts }
    }

    async fn ensure_prompt_exists(&self, prompt_name: &str) -> Result<()> {
        if self.prompts.exists(prompt_name).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "Prompt '{}' not found",
                prompt_name.trim()
            )))
        }
    }

    pub async fn create(
        &self,
        prompt_name: &str,
        dto: CreateTestCaseDto,
    ) -> Result<TestCaseResponseDto> {
        self.ensure_prompt_exists(prompt_name).await?;

        let now = Utc::now();
        let query = format!(
            r#"
            INSERT INTO prompt_test_cases (id, prompt_name, input_values, expected_output, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            TEST_CASE_COLUMNS
        );

        let test_case = sqlx::query_as::<_, TestCase>(&query)
            .bind(Uuid::now_v7())
            .bind(prompt_name.trim())
            .bind(Json(dto.input_values))
            .bind(dto.expected_output)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create test case: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!(
            "Test case created: id={}, prompt={}",
            test_case.id,
            test_case.prompt_name
        );

        Ok(test_case.into())
    }

    /// Test cases of a prompt, oldest first
    pub async fn list(&self, prompt_name: &str) -> Result<Vec<TestCaseResponseDto>> {
        self.ensure_prompt_exists(prompt_name).await?;

        let query = format!(
            "SELECT {} FROM prompt_test_cases WHERE prompt_name = ? ORDER BY created_at ASC, id ASC",
            TEST_CASE_COLUMNS
        );

        let test_cases = sqlx::query_as::<_, TestCase>(&query)
            .bind(prompt_name.trim())
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(test_cases.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, prompt_name: &str, id: Uuid) -> Result<TestCaseResponseDto> {
        let query = format!(
            "SELECT {} FROM prompt_test_cases WHERE id = ? AND prompt_name = ?",
            TEST_CASE_COLUMNS
        );

        sqlx::query_as::<_, TestCase>(&query)
            .bind(id)
            .bind(prompt_name.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Test case {} not found", id)))
    }

    pub async fn update(
        &self,
        prompt_name: &str,
        id: Uuid,
        dto: UpdateTestCaseDto,
    ) -> Result<TestCaseResponseDto> {
        let query = format!(
            r#"
            UPDATE prompt_test_cases
            SET input_values = COALESCE(?, input_values),
                expected_output = COALESCE(?, expected_output),
                updated_at = ?
            WHERE id = ? AND prompt_name = ?
            RETURNING {}
            "#,
            TEST_CASE_COLUMNS
        );

        let test_case = sqlx::query_as::<_, TestCase>(&query)
            .bind(dto.input_values.map(Json))
            .bind(dto.expected_output)
            .bind(Utc::now())
            .bind(id)
            .bind(prompt_name.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound(format!("Test case {} not found", id)))?;

        tracing::info!("Test case updated: id={}", id);

        Ok(test_case.into())
    }

    pub async fn delete(&self, prompt_name: &str, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM prompt_test_cases WHERE id = ? AND prompt_name = ?")
            .bind(id)
            .bind(prompt_name.trim())
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Test case {} not found", id)));
        }

        tracing::info!("Test case deleted: id={}", id);

        Ok(())
    }
}
