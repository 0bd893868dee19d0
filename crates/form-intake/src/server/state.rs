//! Application state for the intake server

use std::sync::Arc;

use crate::config::IntakeConfig;
use crate::error::Result;
use crate::providers::{SqliteSubmissionStore, SubmissionStore};
use crate::storage::UploadStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: IntakeConfig,
    /// Submission records (provider abstraction)
    store: Arc<dyn SubmissionStore>,
    /// Uploaded file bytes
    uploads: UploadStore,
}

impl AppState {
    /// Create application state backed by the configured SQLite database
    pub async fn new(config: IntakeConfig) -> Result<Self> {
        tracing::info!("Initializing intake application state...");

        let storage = config.storage.clone();
        let store = tokio::task::spawn_blocking(move || SqliteSubmissionStore::from_config(&storage))
            .await??;
        tracing::info!(
            "Submission store initialized ({}, {} existing submissions)",
            store.name(),
            store.count().await?
        );

        let state = Self::with_store(config, Arc::new(store));
        state.uploads().ensure_dir().await?;
        tracing::info!("Upload directory: {}", state.uploads().root().display());

        Ok(state)
    }

    /// Create application state around an existing store
    pub fn with_store(config: IntakeConfig, store: Arc<dyn SubmissionStore>) -> Self {
        let uploads = UploadStore::new(config.storage.upload_dir.clone());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                uploads,
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &IntakeConfig {
        &self.inner.config
    }

    /// Get the submission store
    pub fn store(&self) -> &Arc<dyn SubmissionStore> {
        &self.inner.store
    }

    /// Get the upload directory store
    pub fn uploads(&self) -> &UploadStore {
        &self.inner.uploads
    }

    /// Check if the server can serve requests
    pub async fn is_ready(&self) -> bool {
        match self.inner.store.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::warn!("Store health check failed: {}", e);
                false
            }
        }
    }
}
