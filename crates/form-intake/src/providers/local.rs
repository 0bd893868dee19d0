//! Local provider implementations
//!
//! Wraps the synchronous SQLite database so handlers never block the runtime.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::StorageConfig;
use crate::error::Result;
use crate::storage::SubmissionDb;
use crate::types::{NewSubmission, Submission};

use super::submission_store::SubmissionStore;

/// SQLite-backed submission store
pub struct SqliteSubmissionStore {
    db: Arc<SubmissionDb>,
}

impl SqliteSubmissionStore {
    /// Create from an existing database
    pub fn new(db: Arc<SubmissionDb>) -> Self {
        Self { db }
    }

    /// Open the database named in the storage config
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let db = Arc::new(SubmissionDb::new(&config.database_path)?);
        Ok(Self { db })
    }

    /// Fresh in-memory store
    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            db: Arc::new(SubmissionDb::in_memory()?),
        })
    }
}

#[async_trait]
impl SubmissionStore for SqliteSubmissionStore {
    async fn add_submission(&self, submission: NewSubmission) -> Result<Submission> {
        // SubmissionDb is sync, wrap in blocking task
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || db.insert(submission)).await?
    }

    async fn list_submissions(&self) -> Result<Vec<Submission>> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || db.list()).await?
    }

    async fn get_submission(&self, id: i64) -> Result<Option<Submission>> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || db.get(id)).await?
    }

    async fn count(&self) -> Result<usize> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || db.count()).await?
    }

    async fn health_check(&self) -> Result<bool> {
        let db = self.db.clone();
        let ping = tokio::task::spawn_blocking(move || db.ping()).await?;
        Ok(ping.is_ok())
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}
