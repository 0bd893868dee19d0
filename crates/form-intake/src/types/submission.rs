//! Submission record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed form instance with its uploaded files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Storage-assigned id, increasing in creation order
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Generated filenames in the upload directory, in upload order
    pub documents: Vec<String>,
    /// Generated filenames in the upload directory, in upload order
    pub images: Vec<String>,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
}

impl Submission {
    /// Total number of referenced files
    pub fn file_count(&self) -> usize {
        self.documents.len() + self.images.len()
    }

    /// Folder name used at the root of this submission's archive
    pub fn archive_folder(&self) -> String {
        let folder: String = self
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();

        if folder.is_empty() {
            "submission".to_string()
        } else {
            folder
        }
    }

    /// Download name offered for this submission's archive
    pub fn archive_filename(&self) -> String {
        format!("{}_submission.zip", self.name)
    }
}

/// Field values for a submission that has not been stored yet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub documents: Vec<String>,
    pub images: Vec<String>,
}

impl NewSubmission {
    /// Assign identity and creation time
    pub fn into_submission(self, id: i64, created_at: DateTime<Utc>) -> Submission {
        Submission {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            documents: self.documents,
            images: self.images,
            created_at,
        }
    }
}

/// Which file field an upload arrived in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Documents,
    Images,
}

impl FileCategory {
    /// Multipart field name and archive folder for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Documents => "documents",
            FileCategory::Images => "images",
        }
    }

    /// Map a multipart field name to a category
    pub fn from_field(name: &str) -> Option<Self> {
        match name {
            "documents" => Some(FileCategory::Documents),
            "images" => Some(FileCategory::Images),
            _ => None,
        }
    }
}

/// Current time truncated to millisecond precision
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str) -> Submission {
        NewSubmission {
            name: name.to_string(),
            email: "jo@x.com".to_string(),
            phone: "555-1234".to_string(),
            documents: vec!["1_cv.pdf".to_string()],
            images: vec!["1_me.png".to_string()],
        }
        .into_submission(1, now_millis())
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(sample("Jo Lee")).unwrap();
        assert_eq!(value["id"], 1);
        assert!(value["createdAt"].is_string());
        assert!(value.get("created_at").is_none());
        assert_eq!(value["documents"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_archive_names() {
        let sub = sample("Jo Lee");
        assert_eq!(sub.archive_folder(), "Jo_Lee");
        assert_eq!(sub.archive_filename(), "Jo Lee_submission.zip");
        assert_eq!(sample("").archive_folder(), "submission");
        assert_eq!(sub.file_count(), 2);
    }

    #[test]
    fn test_category_from_field() {
        assert_eq!(FileCategory::from_field("images"), Some(FileCategory::Images));
        assert_eq!(FileCategory::from_field("name"), None);
    }
}
