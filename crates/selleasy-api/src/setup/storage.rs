//! Storage backend setup

use anyhow::{Context, Result};
use selleasy_core::Config;
use selleasy_storage::{LocalStorage, Storage};
use std::sync::Arc;

/// Build the media storage backend from configuration.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = LocalStorage::new(config.storage_path.clone(), config.storage_base_url.clone())
        .await
        .context("Failed to initialize local media storage")?;

    tracing::info!(
        backend = storage.backend_type(),
        path = %config.storage_path,
        base_url = %config.storage_base_url,
        "Media storage ready"
    );

    Ok(Arc::new(storage))
}
