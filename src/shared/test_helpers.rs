use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tempfile::TempDir;

use crate::core::config::DatabaseConfig;
use crate::core::database::{create_pool, run_migrations};

/// In-memory database with all migrations applied.
///
/// A single connection is used because every SQLite `:memory:` connection
/// opens its own empty database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");

    run_migrations(&pool)
        .await
        .expect("failed to run migrations");

    pool
}

/// File-backed database opened through the production pool settings, so
/// statements really run on several connections at once.
///
/// The database lives in the returned directory; keep it alive while the
/// pool is in use.
pub async fn file_pool(max_connections: u32) -> (SqlitePool, TempDir) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let config = DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("prompts.db").display()),
        max_connections,
        min_connections: 1,
        acquire_timeout_secs: 30,
        busy_timeout_secs: 30,
    };

    let pool = create_pool(&config)
        .await
        .expect("failed to open file database");
    run_migrations(&pool)
        .await
        .expect("failed to run migrations");

    (pool, dir)
}
