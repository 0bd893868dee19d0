//! Submission listing and archive endpoints

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::archive::build_archive;
use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::Submission;

/// GET /api/submissions - List all submissions in creation order
pub async fn list_submissions(State(state): State<AppState>) -> Result<Json<Vec<Submission>>> {
    let submissions = state.store().list_submissions().await?;
    Ok(Json(submissions))
}

/// GET /api/submissions/:id/archive - Zip of every file the submission references
pub async fn download_archive(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response> {
    let submission = state
        .store()
        .get_submission(id)
        .await?
        .ok_or_else(|| Error::not_found(format!("Submission {} not found", id)))?;

    let archive = build_archive(&submission, state.uploads()).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, attachment(&archive.filename)),
        ],
        archive.bytes,
    )
        .into_response())
}

/// `Content-Disposition` value for a download named `filename`.
///
/// `filename` carries an ASCII fallback; names that need it also get an
/// RFC 5987 `filename*` with the exact UTF-8 name.
pub(crate) fn attachment(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if c == '"' || c == '\\' || !(c.is_ascii_graphic() || c == ' ') {
                '_'
            } else {
                c
            }
        })
        .collect();

    if fallback == filename {
        format!("attachment; filename=\"{}\"", fallback)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            urlencoding::encode(filename)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_name_is_plain() {
        assert_eq!(
            attachment("Jo Lee_submission.zip"),
            "attachment; filename=\"Jo Lee_submission.zip\""
        );
    }

    #[test]
    fn test_non_ascii_name_gets_utf8_parameter() {
        assert_eq!(
            attachment("José Ñ_submission.zip"),
            "attachment; filename=\"Jos_ __submission.zip\"; \
             filename*=UTF-8''Jos%C3%A9%20%C3%91_submission.zip"
        );
    }

    #[test]
    fn test_quotes_are_replaced_in_fallback() {
        let value = attachment("a\"b.zip");
        assert!(value.starts_with("attachment; filename=\"a_b.zip\";"));
        assert!(value.ends_with("filename*=UTF-8''a%22b.zip"));
    }
}
