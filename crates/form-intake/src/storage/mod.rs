//! Storage module for persistent data
//!
//! SQLite holds submission records; the upload directory holds file bytes.

mod database;
mod uploads;

pub use database::SubmissionDb;
pub use uploads::{sanitize_filename, UploadStore};
