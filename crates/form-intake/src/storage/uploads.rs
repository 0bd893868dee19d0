//! Shared upload directory
//!
//! Every uploaded file lands here under a generated name
//! `<unix-millis>_<sanitized original name>`. Lookups are confined to the
//! directory after canonicalization.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};

/// Fallback stem for uploads that arrive without a usable name
const UNNAMED_UPLOAD: &str = "file";

/// Attempts at finding a free name before giving up
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Filesystem store for uploaded file bytes
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Create a store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the uploads
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the upload directory if absent
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Write `data` verbatim under a fresh generated name and return that name.
    ///
    /// Existing files are never overwritten: a name taken within the same
    /// millisecond gets a numeric discriminator.
    pub async fn store(&self, original_name: &str, data: &[u8]) -> Result<String> {
        self.ensure_dir().await?;

        let sanitized = sanitize_filename(original_name);
        let millis = Utc::now().timestamp_millis();

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let filename = generated_name(millis, attempt, &sanitized);
            let path = self.root.join(&filename);

            let file = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;

            match file {
                Ok(mut file) => {
                    file.write_all(data).await?;
                    file.flush().await?;
                    tracing::debug!("Stored upload {} ({} bytes)", filename, data.len());
                    return Ok(filename);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(Error::internal(format!(
            "No free upload name for '{}' after {} attempts",
            sanitized, MAX_NAME_ATTEMPTS
        )))
    }

    /// Resolve a stored filename to a path inside the upload directory.
    ///
    /// Rejects names that are empty, carry path components, or resolve
    /// outside the directory. Missing files are `NotFound`.
    pub async fn resolve(&self, filename: &str) -> Result<PathBuf> {
        validate_lookup_name(filename)?;

        let root = match tokio::fs::canonicalize(&self.root).await {
            Ok(root) => root,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::not_found("File not found"));
            }
            Err(e) => return Err(e.into()),
        };

        let path = match tokio::fs::canonicalize(root.join(filename)).await {
            Ok(path) => path,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::not_found("File not found"));
            }
            Err(e) => return Err(e.into()),
        };

        if !path.starts_with(&root) {
            return Err(Error::InvalidFilename(filename.to_string()));
        }

        if !tokio::fs::metadata(&path).await?.is_file() {
            return Err(Error::not_found("File not found"));
        }

        Ok(path)
    }

    /// Read a stored file's bytes
    pub async fn read(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.resolve(filename).await?;
        Ok(tokio::fs::read(path).await?)
    }
}

/// Replace every character outside `[A-Za-z0-9.]` with `_`.
///
/// Client path separators are replaced too, so `a/b.txt` becomes `a_b.txt`.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '_' })
        .collect();

    if sanitized.is_empty() {
        UNNAMED_UPLOAD.to_string()
    } else {
        sanitized
    }
}

fn generated_name(millis: i64, attempt: u32, sanitized: &str) -> String {
    if attempt == 0 {
        format!("{}_{}", millis, sanitized)
    } else {
        format!("{}_{}_{}", millis, attempt, sanitized)
    }
}

fn validate_lookup_name(filename: &str) -> Result<()> {
    if filename.is_empty() {
        return Err(Error::InvalidFilename("Filename required".to_string()));
    }

    if filename.contains(['/', '\\', '\0']) {
        return Err(Error::InvalidFilename(filename.to_string()));
    }

    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(Error::InvalidFilename(filename.to_string())),
    }
}
