//! Form intake endpoint

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use bytes::Bytes;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{FileCategory, IntakeResponse, NewSubmission};

/// A file part held in memory until the text fields are validated
struct PendingFile {
    category: FileCategory,
    filename: String,
    data: Bytes,
}

/// Everything read from the multipart body
#[derive(Default)]
struct IntakeForm {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    files: Vec<PendingFile>,
}

impl IntakeForm {
    /// Take the required fields, rejecting absent or empty values
    fn required_fields(&mut self) -> Result<(String, String, String)> {
        let take = |field: &mut Option<String>| field.take().filter(|v| !v.is_empty());

        match (take(&mut self.name), take(&mut self.email), take(&mut self.phone)) {
            (Some(name), Some(email), Some(phone)) => Ok((name, email, phone)),
            _ => Err(Error::validation("All fields are required")),
        }
    }
}

/// POST /api/submit - Accept a form with its uploads
pub async fn submit_form(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<IntakeResponse>> {
    let mut form = read_form(multipart?).await?;
    let (name, email, phone) = form.required_fields()?;

    tracing::info!(
        "Intake from '{}' with {} file(s)",
        name,
        form.files.len()
    );

    let mut documents = Vec::new();
    let mut images = Vec::new();

    for file in form.files {
        let stored = state.uploads().store(&file.filename, &file.data).await?;
        match file.category {
            FileCategory::Documents => documents.push(stored),
            FileCategory::Images => images.push(stored),
        }
    }

    let submission = state
        .store()
        .add_submission(NewSubmission {
            name,
            email,
            phone,
            documents,
            images,
        })
        .await?;

    tracing::info!(
        "Stored submission {} ({} documents, {} images)",
        submission.id,
        submission.documents.len(),
        submission.images.len()
    );

    Ok(Json(IntakeResponse::ok()))
}

/// Buffer every part of the body; unknown fields are ignored
async fn read_form(mut multipart: Multipart) -> Result<IntakeForm> {
    let mut form = IntakeForm::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();

        if let Some(category) = FileCategory::from_field(&field_name) {
            let filename = field.file_name().unwrap_or("").to_string();
            let data = field.bytes().await?;

            // Empty file inputs still post a nameless, empty part
            if filename.is_empty() && data.is_empty() {
                continue;
            }

            form.files.push(PendingFile {
                category,
                filename,
                data,
            });
            continue;
        }

        let slot = match field_name.as_str() {
            "name" => &mut form.name,
            "email" => &mut form.email,
            "phone" => &mut form.phone,
            other => {
                tracing::debug!("Ignoring unknown form field '{}'", other);
                continue;
            }
        };
        *slot = Some(field.text().await?);
    }

    Ok(form)
}
