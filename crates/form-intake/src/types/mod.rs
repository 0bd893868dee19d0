//! Core types for the intake service

pub mod response;
pub mod submission;

pub use response::IntakeResponse;
pub use submission::{now_millis, FileCategory, NewSubmission, Submission};
