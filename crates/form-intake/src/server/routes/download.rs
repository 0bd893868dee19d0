//! Single-file download endpoint

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::submissions::attachment;
use crate::error::{Error, Result};
use crate::server::state::AppState;

/// Query parameters for a file download
#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    /// Stored filename inside the upload directory
    pub file: Option<String>,
}

/// GET /api/download?file=<filename> - Return one stored file as an attachment
pub async fn download_file(
    State(state): State<AppState>,
    Query(params): Query<DownloadQuery>,
) -> Result<Response> {
    let filename = params
        .file
        .filter(|f| !f.is_empty())
        .ok_or_else(|| Error::validation("Filename required"))?;

    let path = state.uploads().resolve(&filename).await?;
    let data = tokio::fs::read(&path).await?;

    let content_type = mime_guess::from_path(&path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    tracing::debug!("Serving {} ({} bytes, {})", filename, data.len(), content_type);

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, attachment(&filename)),
        ],
        data,
    )
        .into_response())
}
