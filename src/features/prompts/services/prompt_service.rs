use crate::core::error::{AppError, Result};
use crate::features::prompts::dtos::{PromptQueryParams, PromptVersionResponseDto};
use crate::features::prompts::models::{NewPromptVersion, PromptVersion};
use crate::shared::constants::MAX_PROMPT_NAME_LENGTH;
use crate::shared::prompts::validate_template;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::SqlitePool;
use uuid::Uuid;

const VERSION_COLUMNS: &str =
    "id, prompt_name, version_number, author, template, example_values, upvote_count, created_at";

/// Attempts before giving up when another writer keeps taking the same version number
const MAX_CREATE_ATTEMPTS: usize = 5;

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Durable, append-only storage of prompt versions.
///
/// Every read goes to the database; nothing is cached.
pub struct PromptService {
    pool: SqlitePool,
}

impl std::fmt::Debug for PromptService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptService")
            .field("pool", &"<SqlitePool>")
            .finish()
    }
}

impl PromptService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Save a new immutable version of `input.name`.
    ///
    /// The version number is allocated inside the INSERT itself
    /// (`MAX(version_number) + 1` for the name, or 1), so the read and the
    /// write happen under one SQLite write lock. The unique constraint on
    /// `(prompt_name, version_number)` backs this up for writers on other
    /// connections; a collision is retried with a freshly computed number.
    pub async fn create_version(&self, input: NewPromptVersion) -> Result<PromptVersion> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "Prompt name must not be empty".to_string(),
            ));
        }
        if name.chars().count() > MAX_PROMPT_NAME_LENGTH {
            return Err(AppError::Validation(format!(
                "Prompt name must be at most {} characters",
                MAX_PROMPT_NAME_LENGTH
            )));
        }
        if input.template.trim().is_empty() {
            return Err(AppError::Validation(
                "Template must not be empty".to_string(),
            ));
        }
        validate_template(&input.template).map_err(|e| {
            AppError::Validation(format!("Template compilation failed: {}", e.detail()))
        })?;

        let author = input.author.trim();
        let example_values = Json(input.example_values);
        let query = format!(
            r#"
            INSERT INTO prompt_versions
                (id, prompt_name, version_number, author, template, example_values, upvote_count, created_at)
            SELECT ?, ?, COALESCE(MAX(version_number), 0) + 1, ?, ?, ?, 0, ?
            FROM prompt_versions
            WHERE prompt_name = ?
            RETURNING {}
            "#,
            VERSION_COLUMNS
        );

        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            let result = sqlx::query_as::<_, PromptVersion>(&query)
                .bind(Uuid::now_v7())
                .bind(name)
                .bind(author)
                .bind(&input.template)
                .bind(&example_values)
                .bind(Utc::now())
                .bind(name)
                .fetch_one(&self.pool)
                .await;

            match result {
                Ok(version) => {
                    tracing::info!(
                        "Prompt version created: name={}, version={}, author={}",
                        version.prompt_name,
                        version.version_number,
                        version.author
                    );
                    return Ok(version);
                }
                Err(e) if is_unique_violation(&e) => {
                    tracing::warn!(
                        "Version number collision for prompt '{}' (attempt {}/{})",
                        name,
                        attempt,
                        MAX_CREATE_ATTEMPTS
                    );
                }
                Err(e) => {
                    tracing::error!("Failed to create prompt version: {:?}", e);
                    return Err(AppError::Database(e));
                }
            }
        }

        Err(AppError::Conflict(format!(
            "Could not allocate a version number for prompt '{}', please retry",
            name
        )))
    }

    /// Latest version of every prompt, ordered by prompt name
    pub async fn list_latest(&self) -> Result<Vec<PromptVersion>> {
        let query = format!(
            r#"
            SELECT {}
            FROM prompt_versions pv
            WHERE pv.version_number = (
                SELECT MAX(latest.version_number)
                FROM prompt_versions latest
                WHERE latest.prompt_name = pv.prompt_name
            )
            ORDER BY pv.prompt_name ASC
            "#,
            VERSION_COLUMNS
        );

        sqlx::query_as::<_, PromptVersion>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    /// All versions of `name`, oldest first. Empty when the prompt is unknown.
    pub async fn list_versions(&self, name: &str) -> Result<Vec<PromptVersion>> {
        let query = format!(
            r#"
            SELECT {}
            FROM prompt_versions
            WHERE prompt_name = ?
            ORDER BY version_number ASC
            "#,
            VERSION_COLUMNS
        );

        sqlx::query_as::<_, PromptVersion>(&query)
            .bind(name.trim())
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    pub async fn get_version(&self, name: &str, version_number: i64) -> Result<PromptVersion> {
        let query = format!(
            "SELECT {} FROM prompt_versions WHERE prompt_name = ? AND version_number = ?",
            VERSION_COLUMNS
        );

        sqlx::query_as::<_, PromptVersion>(&query)
            .bind(name.trim())
            .bind(version_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Prompt '{}' version {} not found",
                    name.trim(),
                    version_number
                ))
            })
    }

    pub async fn get_latest(&self, name: &str) -> Result<PromptVersion> {
        let query = format!(
            r#"
            SELECT {}
            FROM prompt_versions
            WHERE prompt_name = ?
            ORDER BY version_number DESC
            LIMIT 1
            "#,
            VERSION_COLUMNS
        );

        sqlx::query_as::<_, PromptVersion>(&query)
            .bind(name.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound(format!("Prompt '{}' not found", name.trim())))
    }

    /// Whether any version of `name` exists
    pub async fn exists(&self, name: &str) -> Result<bool> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM prompt_versions WHERE prompt_name = ? LIMIT 1")
                .bind(name.trim())
                .fetch_optional(&self.pool)
                .await
                .map_err(AppError::Database)?;

        Ok(found.is_some())
    }

    /// Increment one version's upvote count and return the new count.
    pub async fn upvote(&self, name: &str, version_number: i64) -> Result<i64> {
        let count: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE prompt_versions
            SET upvote_count = upvote_count + 1
            WHERE prompt_name = ? AND version_number = ?
            RETURNING upvote_count
            "#,
        )
        .bind(name.trim())
        .bind(version_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let count = count.ok_or_else(|| {
            AppError::NotFound(format!(
                "Prompt '{}' version {} not found",
                name.trim(),
                version_number
            ))
        })?;

        tracing::info!(
            "Prompt upvoted: name={}, version={}, upvotes={}",
            name.trim(),
            version_number,
            count
        );

        Ok(count)
    }

    /// Latest version of every prompt whose name or latest template contains
    /// `query`, ignoring case. A blank query matches everything.
    pub async fn search(&self, query: &str) -> Result<Vec<PromptVersion>> {
        let latest = self.list_latest().await?;
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(latest);
        }

        tracing::debug!("Searching prompts for '{}'", needle);

        Ok(latest
            .into_iter()
            .filter(|v| {
                v.prompt_name.to_lowercase().contains(&needle)
                    || v.template.to_lowercase().contains(&needle)
            })
            .collect())
    }

    /// One page of the browse listing plus the total number of matches
    pub async fn browse(
        &self,
        params: &PromptQueryParams,
    ) -> Result<(Vec<PromptVersionResponseDto>, i64)> {
        let matches = match params.search.as_deref() {
            Some(query) => self.search(query).await?,
            None => self.list_latest().await?,
        };
        let total = matches.len() as i64;

        let page = matches
            .into_iter()
            .skip(usize::try_from(params.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(params.limit()).unwrap_or(usize::MAX))
            .map(PromptVersionResponseDto::from)
            .collect();

        Ok((page, total))
    }
}
