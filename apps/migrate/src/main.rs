//! Staybook schema migration runner.
//!
//! Loads `.env`, connects to the configured Postgres database and applies
//! the embedded migrations. Run before starting any service that touches
//! the identity tables.

#![forbid(unsafe_code)]

use staybook_core::AppError;
use staybook_infrastructure::{DatabaseConfig, MIGRATOR};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = DatabaseConfig::from_env()?;
    let pool = config.connect().await?;

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    info!(database = %config.name, "migrations applied");

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
