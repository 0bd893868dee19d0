//! form-intake: Web form intake with file uploads and per-submitter archives
//!
//! Visitors submit name, email and phone along with any number of documents and
//! images. Files land in an upload directory under generated names, submission
//! records live in SQLite, and an admin dashboard lists every submission with a
//! one-click zip of that person's files.

pub mod archive;
pub mod client;
pub mod config;
pub mod error;
pub mod providers;
pub mod server;
pub mod storage;
pub mod types;
pub mod ui;

pub use archive::{build_archive, FileSource, SubmissionArchive};
pub use client::IntakeClient;
pub use config::IntakeConfig;
pub use error::{Error, Result};
pub use server::IntakeServer;
pub use types::{FileCategory, IntakeResponse, NewSubmission, Submission};
