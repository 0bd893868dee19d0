//! API routes for the intake server

pub mod download;
pub mod pages;
pub mod submissions;
pub mod submit;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Intake - with larger body limit for file uploads
        .route(
            "/submit",
            post(submit::submit_form).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Listing and per-submission archives
        .route("/submissions", get(submissions::list_submissions))
        .route("/submissions/:id/archive", get(submissions::download_archive))
        // Single file fetch
        .route("/download", get(download::download_file))
        // Info
        .route("/info", get(info))
}

/// Page routes
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::form_page))
        .route("/admin", get(pages::dashboard_page))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "form-intake",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Form intake with file uploads and per-submission archives",
        "endpoints": {
            "POST /api/submit": "Submit name, email, phone with documents and images (multipart)",
            "GET /api/submissions": "List all submissions in creation order",
            "GET /api/submissions/:id/archive": "Download a submission's files as a zip",
            "GET /api/download?file=": "Download a single stored file",
            "GET /uploads/:file": "Stored file, served directly"
        }
    }))
}
