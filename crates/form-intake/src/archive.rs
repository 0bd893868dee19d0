//! Per-submission zip assembly
//!
//! Gathers every file a submission references from a [`FileSource`] and packs
//! them into a zip laid out as:
//!
//! ```text
//! <folder>/documents/<file>
//! <folder>/images/<file>
//! ```
//!
//! All fetches must succeed; the first failure aborts the whole archive and
//! any bytes already fetched are dropped.

use async_trait::async_trait;
use futures::future::try_join_all;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};
use crate::storage::UploadStore;
use crate::types::{FileCategory, Submission};

/// Somewhere stored files can be fetched from by name
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Fetch the raw bytes of a stored file
    async fn fetch(&self, filename: &str) -> Result<Vec<u8>>;
}

#[async_trait]
impl FileSource for UploadStore {
    async fn fetch(&self, filename: &str) -> Result<Vec<u8>> {
        self.read(filename).await
    }
}

/// A finished archive ready to hand to the caller
#[derive(Debug, Clone)]
pub struct SubmissionArchive {
    /// Suggested download name
    pub filename: String,
    /// Zip bytes
    pub bytes: Vec<u8>,
    /// Number of files packed
    pub file_count: usize,
}

/// A fetched file waiting to be packed
struct GatheredFile {
    category: FileCategory,
    filename: String,
    bytes: Vec<u8>,
}

/// Fetch every file of `submission` from `source` and build its archive
pub async fn build_archive<S>(submission: &Submission, source: &S) -> Result<SubmissionArchive>
where
    S: FileSource + ?Sized,
{
    let gathered = gather(submission, source).await?;
    let file_count = gathered.len();
    let bytes = pack(&submission.archive_folder(), &gathered)?;

    tracing::info!(
        "Built archive for submission {} ({} files, {} bytes)",
        submission.id,
        file_count,
        bytes.len()
    );

    Ok(SubmissionArchive {
        filename: submission.archive_filename(),
        bytes,
        file_count,
    })
}

async fn gather<S>(submission: &Submission, source: &S) -> Result<Vec<GatheredFile>>
where
    S: FileSource + ?Sized,
{
    let wanted = submission
        .documents
        .iter()
        .map(|f| (FileCategory::Documents, f))
        .chain(submission.images.iter().map(|f| (FileCategory::Images, f)));

    let fetches = wanted.map(|(category, filename)| async move {
        let bytes = source.fetch(filename).await.map_err(|e| match e {
            Error::NotFound(_) => Error::not_found(format!("Failed to fetch {}", filename)),
            other => other,
        })?;

        Ok::<_, Error>(GatheredFile {
            category,
            filename: filename.clone(),
            bytes,
        })
    });

    try_join_all(fetches).await
}

fn pack(folder: &str, files: &[GatheredFile]) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    zip.add_directory(format!("{}/", folder), options)?;

    for file in files {
        let entry = format!("{}/{}/{}", folder, file.category.as_str(), file.filename);
        zip.start_file(entry, options)?;
        zip.write_all(&file.bytes)?;
    }

    Ok(zip.finish()?.into_inner())
}
