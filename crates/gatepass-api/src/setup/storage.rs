//! Photo storage setup

use std::sync::Arc;

use anyhow::{Context, Result};
use gatepass_core::Config;
use gatepass_storage::{create_storage, Storage};

/// Create the configured storage backend.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize photo storage backend")?;

    tracing::info!(backend = %config.storage_backend(), "Photo storage initialized");

    Ok(storage)
}
