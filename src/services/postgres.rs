use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Build the shared connection pool and run migrations on startup
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
    acquire_timeout_secs: Option<u64>,
    idle_timeout_secs: Option<u64>,
) -> Result<PgPool, PostgresError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(min_connections)
        .acquire_timeout(Duration::from_secs(acquire_timeout_secs.unwrap_or(5)))
        .idle_timeout(Duration::from_secs(idle_timeout_secs.unwrap_or(600)))
        .test_before_acquire(true)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Health check for the database connection
pub async fn health_check(pool: &PgPool) -> Result<bool, PostgresError> {
    sqlx::query("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| true)
        .map_err(Into::into)
}
