use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::BTreeMap;
use uuid::Uuid;

/// One immutable row of a prompt's history
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PromptVersion {
    pub id: Uuid,
    pub prompt_name: String,
    pub version_number: i64,
    pub author: String,
    pub template: String,
    pub example_values: Json<BTreeMap<String, String>>,
    pub upvote_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Input for allocating the next version of a prompt
#[derive(Debug, Clone, Default)]
pub struct NewPromptVersion {
    pub name: String,
    pub author: String,
    pub template: String,
    pub example_values: BTreeMap<String, String>,
}
