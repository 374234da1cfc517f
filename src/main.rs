//! Release Ledger - Main Entry Point

use std::net::SocketAddr;
use std::sync::Arc;

use release_ledger_backend::api::{self, routes};
use release_ledger_backend::config::Config;
use release_ledger_backend::db;
use release_ledger_backend::error::Result;
use release_ledger_backend::storage::filesystem::FilesystemOutbox;
use release_ledger_backend::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    telemetry::init_tracing(&config.log_level);
    tracing::info!("Starting Release Ledger");

    // Connect to database
    let db_pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations").run(&db_pool).await?;
    tracing::info!("Database migrations complete");

    // Outbox directory for publication notices
    let outbox = Arc::new(FilesystemOutbox::new(config.outbox_path.clone()));

    let state = Arc::new(api::AppState::new(config.clone(), db_pool, outbox));
    let app = routes::create_router(state);

    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        release_ledger_backend::AppError::Config(format!(
            "invalid BIND_ADDRESS {:?}: {e}",
            config.bind_address
        ))
    })?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
