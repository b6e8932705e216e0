//! Application setup and initialization
//!
//! All startup logic lives here instead of main.rs: configuration checks,
//! tracing, database, storage, and route wiring.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::{AppState, DbState, MediaConfig};
use anyhow::{Context, Result};
use selleasy_core::Config;
use selleasy_db::ProductRepository;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_tracing();
    tracing::info!(environment = %config.environment, "Configuration loaded and validated");

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState {
        db: DbState {
            pool: pool.clone(),
            products: ProductRepository::new(pool),
        },
        media: MediaConfig {
            storage,
            max_files: config.max_media_files,
            max_file_size: config.max_file_size_bytes,
        },
        config: config.clone(),
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
