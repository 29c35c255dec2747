//! Serve command - Starts the HTTP server.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{
    Cache, Database, JazzCashGateway, JpegImageEncoder, LocalObjectStorage, PaymentGateway,
    PostgresEmailQueue, RedisOtpStore,
};
use crate::jobs::connect_email_storage;
use crate::services::{Adapters, Services};

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!(env = %config.app_env, "Starting server...");

    // Connects and applies pending migrations
    let db = Database::connect(&config).await?;
    let cache = Cache::connect(&config).await?;
    let email_storage = connect_email_storage(&config.database_url).await?;

    let gateway =
        JazzCashGateway::from_config(&config).map(|g| Arc::new(g) as Arc<dyn PaymentGateway>);

    let adapters = Adapters {
        otp_store: Arc::new(RedisOtpStore::new(cache.clone())),
        mail: Arc::new(PostgresEmailQueue::new(email_storage)),
        storage: Arc::new(LocalObjectStorage::new(
            config.media_dir.clone(),
            config.media_base_url.clone(),
        )),
        encoder: Arc::new(JpegImageEncoder::default()),
        gateway,
    };

    let media_dir = config.media_dir.clone();
    let services = Services::from_connection(db.get_connection(), adapters, config);

    let cache = Arc::new(cache);
    let state = AppState::from_container(&services, cache.clone(), Arc::new(db), cache);

    let app = create_router(state, Path::new(&media_dir));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    // Client addresses feed the rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
