//! ARX Server — storage bootstrap entry point.
//!
//! The access layer is a library; this binary initializes the SurrealDB
//! schema so a host application can embed the gate against a prepared
//! database.

use arx_db::{DbConfig, DbManager};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("arx=info".parse().unwrap()))
        .json()
        .init();

    tracing::info!("Starting ARX storage bootstrap...");

    let config = DbConfig::from_env();
    let manager = match DbManager::connect(&config).await {
        Ok(manager) => manager,
        Err(e) => {
            tracing::error!(error = %e, "failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(e) = arx_db::run_migrations(manager.client()).await {
        tracing::error!(error = %e, "migrations failed");
        std::process::exit(1);
    }

    tracing::info!("Schema ready. ARX is a library — embed arx-access in your application.");
}
