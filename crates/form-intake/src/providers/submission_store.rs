//! Submission store provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{NewSubmission, Submission};

/// Trait for submission record storage
///
/// Records are append-only: there is no update or delete.
///
/// Implementations:
/// - `SqliteSubmissionStore`: SQLite file (or in-memory database)
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Append a submission, assigning a fresh id and the current time
    async fn add_submission(&self, submission: NewSubmission) -> Result<Submission>;

    /// All submissions in creation order
    async fn list_submissions(&self) -> Result<Vec<Submission>>;

    /// Look up a submission by id
    async fn get_submission(&self, id: i64) -> Result<Option<Submission>>;

    /// Number of stored submissions
    async fn count(&self) -> Result<usize> {
        Ok(self.list_submissions().await?.len())
    }

    /// Check if the provider is healthy
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
