//! Provider abstractions for submission storage
//!
//! Handlers only see `SubmissionStore`, so the backend can change without
//! touching them.

pub mod local;
pub mod submission_store;

pub use local::SqliteSubmissionStore;
pub use submission_store::SubmissionStore;
