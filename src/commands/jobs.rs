//! Jobs command - Background email worker and queue maintenance.
//!
//! ```bash
//! wayfarer jobs work    # deliver queued emails
//! wayfarer jobs list    # counts per job status
//! wayfarer jobs clear   # drop failed jobs
//! ```

use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};

use crate::cli::args::{JobsAction, JobsArgs};
use crate::config::{Config, EMAIL_WORKER_NAME};
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the jobs command
pub async fn execute(args: JobsArgs, config: Config) -> AppResult<()> {
    match args.action {
        JobsAction::Work => run_worker(&config).await,
        JobsAction::List => list_jobs(&config).await,
        JobsAction::Clear => clear_failed_jobs(&config).await,
    }
}

/// Consume the email queue until Ctrl+C.
async fn run_worker(config: &Config) -> AppResult<()> {
    use apalis::prelude::*;

    use crate::jobs::{connect_email_storage, email_job_handler};

    let storage = connect_email_storage(&config.database_url).await?;

    let worker = WorkerBuilder::new(EMAIL_WORKER_NAME)
        .backend(storage)
        .build_fn(email_job_handler);
    let monitor = Monitor::new().register(worker);

    tracing::info!(worker = EMAIL_WORKER_NAME, "Job worker started");

    tokio::select! {
        result = monitor.run() => {
            result.map_err(|e| AppError::internal(format!("Worker failed: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping worker...");
        }
    }

    tracing::info!("Job worker stopped");
    Ok(())
}

/// Job counts by status.
#[derive(Debug, Default, PartialEq, Eq)]
struct QueueStatus {
    pending: i64,
    running: i64,
    failed: i64,
    done: i64,
}

impl QueueStatus {
    fn record(&mut self, status: &str, count: i64) {
        match status {
            "Pending" => self.pending = count,
            "Running" => self.running = count,
            "Failed" | "Killed" => self.failed += count,
            "Done" => self.done = count,
            other => tracing::debug!(status = other, count, "Ignoring job status"),
        }
    }
}

async fn connect(config: &Config) -> AppResult<DatabaseConnection> {
    let db = Database::connect_without_migrations(config)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect to database: {}", e)))?;
    Ok(db.get_connection())
}

/// Whether a worker has created the apalis tables yet.
async fn queue_initialized(db: &DatabaseConnection) -> AppResult<bool> {
    let row = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            "SELECT EXISTS(SELECT 1 FROM information_schema.schemata WHERE schema_name = 'apalis') AS exists",
        ))
        .await?;

    Ok(row
        .and_then(|r| r.try_get::<bool>("", "exists").ok())
        .unwrap_or(false))
}

async fn list_jobs(config: &Config) -> AppResult<()> {
    let db = connect(config).await?;

    if !queue_initialized(&db).await? {
        println!("Job queue not initialized. Run 'jobs work' to create it.");
        return Ok(());
    }

    let rows = db
        .query_all(Statement::from_string(
            db.get_database_backend(),
            "SELECT status::text AS status, COUNT(*)::bigint AS count FROM apalis.jobs GROUP BY status",
        ))
        .await?;

    let mut status = QueueStatus::default();
    for row in rows {
        if let (Ok(name), Ok(count)) = (
            row.try_get::<String>("", "status"),
            row.try_get::<i64>("", "count"),
        ) {
            status.record(&name, count);
        }
    }

    println!("\n=== Email Queue ===");
    println!("Pending:  {}", status.pending);
    println!("Running:  {}", status.running);
    println!("Failed:   {}", status.failed);
    println!("Done:     {}", status.done);
    println!("===================\n");

    Ok(())
}

async fn clear_failed_jobs(config: &Config) -> AppResult<()> {
    let db = connect(config).await?;

    if !queue_initialized(&db).await? {
        println!("Job queue not initialized. Nothing to clear.");
        return Ok(());
    }

    let result = db
        .execute(Statement::from_string(
            db.get_database_backend(),
            "DELETE FROM apalis.jobs WHERE status IN ('Failed', 'Killed')",
        ))
        .await?;

    println!("Cleared {} failed job(s).", result.rows_affected());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_status_folds_killed_into_failed() {
        let mut status = QueueStatus::default();
        status.record("Pending", 3);
        status.record("Failed", 2);
        status.record("Killed", 1);
        status.record("Scheduled", 9);

        assert_eq!(
            status,
            QueueStatus {
                pending: 3,
                running: 0,
                failed: 3,
                done: 0,
            }
        );
    }
}
