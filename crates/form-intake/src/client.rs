//! HTTP client for the intake API
//!
//! Used by the `intake-admin` binary to list submissions and assemble
//! archives locally, fetching each file through the download endpoint.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

use crate::archive::FileSource;
use crate::error::{Error, Result};
use crate::types::Submission;

/// Client for a running intake server
#[derive(Debug, Clone)]
pub struct IntakeClient {
    http: reqwest::Client,
    base_url: String,
}

impl IntakeClient {
    /// Create a client for the server at `base_url` (e.g. `http://localhost:8080`)
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self::with_http_client(http, base_url))
    }

    /// Create a client around a preconfigured `reqwest::Client`
    pub fn with_http_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Server base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /api/submissions
    pub async fn list_submissions(&self) -> Result<Vec<Submission>> {
        let response = self
            .http
            .get(format!("{}/api/submissions", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::internal(format!(
                "Failed to fetch submissions ({})",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    /// Find one submission in the listing
    pub async fn get_submission(&self, id: i64) -> Result<Submission> {
        self.list_submissions()
            .await?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::not_found(format!("Submission {} not found", id)))
    }

    /// GET /api/download?file=<filename>
    pub async fn download_file(&self, filename: &str) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(format!("{}/api/download", self.base_url))
            .query(&[("file", filename)])
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.bytes().await?.to_vec()),
            StatusCode::NOT_FOUND => Err(Error::not_found(format!("Failed to fetch {}", filename))),
            StatusCode::BAD_REQUEST => Err(Error::InvalidFilename(filename.to_string())),
            status => Err(Error::internal(format!(
                "Failed to fetch {} ({})",
                filename, status
            ))),
        }
    }
}

#[async_trait]
impl FileSource for IntakeClient {
    async fn fetch(&self, filename: &str) -> Result<Vec<u8>> {
        tracing::debug!("Fetching {} from {}", filename, self.base_url);
        self.download_file(filename).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;

    use crate::archive::build_archive;
    use crate::config::IntakeConfig;
    use crate::providers::SqliteSubmissionStore;
    use crate::server::{build_router, state::AppState};
    use crate::types::NewSubmission;

    async fn serve(state: AppState) -> IntakeClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = build_router(state);
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        IntakeClient::with_http_client(http, format!("http://{}", addr))
    }

    #[tokio::test]
    async fn test_gather_over_http_and_abort_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = IntakeConfig::default();
        config.storage.upload_dir = dir.path().join("uploads");

        let store = Arc::new(SqliteSubmissionStore::in_memory().unwrap());
        let state = AppState::with_store(config, store);

        let cv = state.uploads().store("cv.pdf", b"%PDF-1.4").await.unwrap();
        let photo = state.uploads().store("me.png", &[0x89, b'P', b'N', b'G']).await.unwrap();
        state
            .store()
            .add_submission(NewSubmission {
                name: "Jo Lee".to_string(),
                email: "jo@x.com".to_string(),
                phone: "555-1234".to_string(),
                documents: vec![cv.clone()],
                images: vec![photo.clone()],
            })
            .await
            .unwrap();

        let client = serve(state.clone()).await;
        let submission = client.get_submission(1).await.unwrap();

        let archive = build_archive(&submission, &client).await.unwrap();
        assert_eq!(archive.filename, "Jo Lee_submission.zip");
        assert_eq!(archive.file_count, 2);

        let zip = zip::ZipArchive::new(Cursor::new(archive.bytes)).unwrap();
        let mut names: Vec<&str> = zip.file_names().collect();
        names.sort();
        assert_eq!(
            names,
            [
                "Jo_Lee/".to_string(),
                format!("Jo_Lee/documents/{}", cv),
                format!("Jo_Lee/images/{}", photo),
            ]
        );

        std::fs::remove_file(state.uploads().root().join(&photo)).unwrap();

        let err = build_archive(&submission, &client).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(err.to_string(), format!("Failed to fetch {}", photo));

        assert!(matches!(
            client.get_submission(99).await,
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_base_url_trimmed() {
        let client = IntakeClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }
}
