//! Background jobs processed by the `jobs work` command.

mod email_job;

use apalis_sql::postgres::PostgresStorage;
use apalis_sql::sqlx::postgres::PgPoolOptions;

use crate::config::JOB_POOL_MAX_CONNECTIONS;
use crate::errors::{AppError, AppResult};

pub use email_job::{email_job_handler, EmailJob};

/// Open the apalis email queue, creating its tables on first use.
///
/// Shared by the API process (producer) and the worker (consumer).
pub async fn connect_email_storage(database_url: &str) -> AppResult<PostgresStorage<EmailJob>> {
    let pool = PgPoolOptions::new()
        .max_connections(JOB_POOL_MAX_CONNECTIONS)
        .connect(database_url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect job queue: {}", e)))?;

    PostgresStorage::setup(&pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to setup job storage: {}", e)))?;

    Ok(PostgresStorage::new(pool))
}
