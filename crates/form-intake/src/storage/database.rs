//! SQLite database for submission records
//!
//! One `submissions` table; document and image filename lists are stored as
//! comma-joined text.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::types::{now_millis, NewSubmission, Submission};

/// SQLite-based submission database
pub struct SubmissionDb {
    conn: Arc<Mutex<Connection>>,
}

impl SubmissionDb {
    /// Create or open the database at the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.migrate()?;
        tracing::info!("Opened submission database at {}", path.display());
        Ok(db)
    }

    /// Create an in-memory database (tests, throwaway runs)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.migrate()?;
        Ok(db)
    }

    /// Run database migrations
    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            "#,
        )?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS submissions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT NOT NULL,
                documents TEXT NOT NULL DEFAULT '',
                images TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            );
            "#,
        )?;

        tracing::debug!("Database migrations complete");
        Ok(())
    }

    /// Append a submission, assigning its id and creation time
    pub fn insert(&self, new: NewSubmission) -> Result<Submission> {
        let created_at = now_millis();
        let conn = self.conn.lock();

        conn.execute(
            r#"
            INSERT INTO submissions (name, email, phone, documents, images, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                new.name,
                new.email,
                new.phone,
                join_filenames(&new.documents),
                join_filenames(&new.images),
                created_at.to_rfc3339(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Ok(new.into_submission(id, created_at))
    }

    /// All submissions in creation order
    pub fn list(&self) -> Result<Vec<Submission>> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare(
            "SELECT id, name, email, phone, documents, images, created_at
             FROM submissions ORDER BY id ASC",
        )?;

        let submissions = stmt
            .query_map([], row_to_submission)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(submissions)
    }

    /// Look up one submission
    pub fn get(&self, id: i64) -> Result<Option<Submission>> {
        let conn = self.conn.lock();

        let submission = conn
            .query_row(
                "SELECT id, name, email, phone, documents, images, created_at
                 FROM submissions WHERE id = ?1",
                params![id],
                row_to_submission,
            )
            .optional()?;

        Ok(submission)
    }

    /// Number of stored submissions
    pub fn count(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM submissions", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Cheap liveness query
    pub fn ping(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }
}

fn join_filenames(filenames: &[String]) -> String {
    filenames.join(",")
}

fn split_filenames(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn row_to_submission(row: &Row<'_>) -> rusqlite::Result<Submission> {
    let documents: String = row.get(4)?;
    let images: String = row.get(5)?;
    let created_at: String = row.get(6)?;

    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Submission {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        documents: split_filenames(&documents),
        images: split_filenames(&images),
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_submission(name: &str, documents: &[&str], images: &[&str]) -> NewSubmission {
        NewSubmission {
            name: name.to_string(),
            email: format!("{}@x.com", name.to_lowercase()),
            phone: "555-1234".to_string(),
            documents: documents.iter().map(|s| s.to_string()).collect(),
            images: images.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_insert_and_list() {
        let db = SubmissionDb::in_memory().unwrap();

        let stored = db
            .insert(new_submission("Jo", &["1_cv.pdf"], &["1_me.png", "2_me.png"]))
            .unwrap();
        assert_eq!(stored.id, 1);

        let listed = db.list().unwrap();
        assert_eq!(listed, vec![stored]);
        assert_eq!(listed[0].images, vec!["1_me.png", "2_me.png"]);
    }

    #[test]
    fn test_empty_file_lists_round_trip() {
        let db = SubmissionDb::in_memory().unwrap();
        db.insert(new_submission("Ann", &[], &[])).unwrap();

        let listed = db.list().unwrap();
        assert!(listed[0].documents.is_empty());
        assert!(listed[0].images.is_empty());
    }

    #[test]
    fn test_ids_increase_in_creation_order() {
        let db = SubmissionDb::in_memory().unwrap();
        for name in ["A", "B", "C"] {
            db.insert(new_submission(name, &[], &[])).unwrap();
        }

        let listed = db.list().unwrap();
        let names: Vec<_> = listed.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert!(listed.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(db.count().unwrap(), 3);
    }

    #[test]
    fn test_get_missing() {
        let db = SubmissionDb::in_memory().unwrap();
        assert!(db.get(42).unwrap().is_none());
    }

    #[test]
    fn test_reopen_keeps_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("submissions.db");

        {
            let db = SubmissionDb::new(&path).unwrap();
            db.insert(new_submission("Jo", &["1_a.txt"], &[])).unwrap();
        }

        let db = SubmissionDb::new(&path).unwrap();
        let stored = db.get(1).unwrap().unwrap();
        assert_eq!(stored.documents, vec!["1_a.txt"]);

        let next = db.insert(new_submission("Kim", &[], &[])).unwrap();
        assert_eq!(next.id, 2);
    }
}
