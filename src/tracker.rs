//! CSV application tracker.
//!
//! One row per discovered posting, carried across runs. The search command
//! appends newly found jobs, the apply command flips rows to `applied`, and
//! the track command lists and edits rows by hand.

use std::path::{Path, PathBuf};

use applyflow_core_types::JobPosting;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// URL prefix length used to match a posting back to its tracker row; query
/// strings and trailing slugs vary between visits.
const URL_MATCH_PREFIX: usize = 60;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("tracker I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("tracker CSV error at {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}

/// One tracked posting.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrackerRow {
    pub id: String,
    pub date_found: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub region: String,
    pub source: String,
    pub url: String,
    pub salary: String,
    pub score: String,
    pub status: String,
    pub cover_letter_file: String,
    pub notes: String,
}

/// The tracker file plus its in-memory rows.
#[derive(Debug)]
pub struct Tracker {
    path: PathBuf,
    rows: Vec<TrackerRow>,
}

impl Tracker {
    /// Load the tracker, tolerating a missing file. A file with foreign
    /// headers is treated as empty rather than corrupting future writes.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, TrackerError> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self {
                path,
                rows: Vec::new(),
            });
        }
        let mut reader = csv::Reader::from_path(&path).map_err(|source| TrackerError::Csv {
            path: path.clone(),
            source,
        })?;
        let compatible = reader
            .headers()
            .map(|headers| headers.iter().any(|header| header == "title"))
            .unwrap_or(false);
        if !compatible {
            warn!(path = %path.display(), "tracker has incompatible headers, starting fresh");
            return Ok(Self {
                path,
                rows: Vec::new(),
            });
        }
        let mut rows = Vec::new();
        for record in reader.deserialize() {
            let row: TrackerRow = record.map_err(|source| TrackerError::Csv {
                path: path.clone(),
                source,
            })?;
            rows.push(row);
        }
        Ok(Self { path, rows })
    }

    pub fn save(&self) -> Result<(), TrackerError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| TrackerError::Io {
                path: self.path.clone(),
                source,
            })?;
        }
        let mut writer =
            csv::Writer::from_path(&self.path).map_err(|source| TrackerError::Csv {
                path: self.path.clone(),
                source,
            })?;
        for row in &self.rows {
            writer.serialize(row).map_err(|source| TrackerError::Csv {
                path: self.path.clone(),
                source,
            })?;
        }
        writer.flush().map_err(|source| TrackerError::Io {
            path: self.path.clone(),
            source,
        })
    }

    pub fn rows(&self) -> &[TrackerRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether a posting with this title and company is already tracked.
    pub fn contains(&self, title: &str, company: &str) -> bool {
        let key = (title.to_lowercase(), company.to_lowercase());
        self.rows.iter().any(|row| {
            (row.title.to_lowercase(), row.company.to_lowercase()) == key
        })
    }

    /// Append a newly discovered posting with the next sequential id.
    pub fn add_posting(&mut self, job: &JobPosting, score: i32, status: &str, notes: &str) {
        let row = TrackerRow {
            id: (self.rows.len() + 1).to_string(),
            date_found: Utc::now().format("%Y-%m-%d").to_string(),
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            region: job.region.clone(),
            source: job.source.clone(),
            url: job.url.clone(),
            salary: job.salary.clone().unwrap_or_default(),
            score: score.to_string(),
            status: status.to_string(),
            cover_letter_file: String::new(),
            notes: notes.to_string(),
        };
        self.rows.push(row);
    }

    /// Update every row whose URL shares the match prefix with `url`.
    /// Returns whether anything changed.
    pub fn update_status(&mut self, url: &str, status: &str, notes: &str) -> bool {
        let prefix: String = url.chars().take(URL_MATCH_PREFIX).collect();
        if prefix.is_empty() {
            return false;
        }
        let mut updated = false;
        for row in &mut self.rows {
            if row.url.starts_with(&prefix) {
                row.status = status.to_string();
                if !notes.is_empty() {
                    if row.notes.is_empty() {
                        row.notes = notes.to_string();
                    } else {
                        row.notes = format!("{} | {}", row.notes, notes);
                    }
                }
                updated = true;
            }
        }
        updated
    }

    /// Record the rendered letter file and flip the row to `cover_ready`,
    /// so re-running generation does not touch it again.
    pub fn mark_cover_ready(&mut self, id: &str, file: &str) -> bool {
        let mut updated = false;
        for row in &mut self.rows {
            if row.id == id {
                row.cover_letter_file = file.to_string();
                row.status = "cover_ready".to_string();
                updated = true;
            }
        }
        updated
    }

    pub fn mark_applied_by_id(&mut self, id: &str, notes: &str) -> bool {
        let mut updated = false;
        for row in &mut self.rows {
            if row.id == id {
                row.status = "applied".to_string();
                if !notes.is_empty() {
                    row.notes = notes.to_string();
                }
                updated = true;
            }
        }
        updated
    }

    /// Whether this URL belongs to an already-applied row.
    pub fn already_applied(&self, url: &str) -> bool {
        let prefix: String = url.chars().take(URL_MATCH_PREFIX).collect();
        !prefix.is_empty()
            && self
                .rows
                .iter()
                .any(|row| row.status == "applied" && row.url.starts_with(&prefix))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(url: &str) -> JobPosting {
        JobPosting::new("Rust Engineer", "Acme", url)
            .with_location("London")
            .with_region("uk")
            .with_source("adzuna")
    }

    #[test]
    fn round_trips_rows_through_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.csv");

        let mut tracker = Tracker::load(&path).unwrap();
        tracker.add_posting(&job("https://jobs.example.com/1"), 7, "found", "");
        tracker.add_posting(&job("https://jobs.example.com/2"), 9, "found", "");
        tracker.save().unwrap();

        let reloaded = Tracker::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.rows()[0].id, "1");
        assert_eq!(reloaded.rows()[1].id, "2");
        assert_eq!(reloaded.rows()[0].score, "7");
        assert_eq!(reloaded.rows()[0].status, "found");
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = Tracker::load(dir.path().join("absent.csv")).unwrap();
        assert!(tracker.is_empty());
    }

    #[test]
    fn foreign_headers_start_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.csv");
        std::fs::write(&path, "a,b,c\n1,2,3\n").unwrap();
        let tracker = Tracker::load(&path).unwrap();
        assert!(tracker.is_empty());
    }

    #[test]
    fn update_status_matches_on_url_prefix() {
        let long_url =
            "https://www.linkedin.com/jobs/view/1234567890/?refId=abcdefgh&trackingId=xyz";
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = Tracker::load(dir.path().join("tracker.csv")).unwrap();
        tracker.add_posting(&job(long_url), 5, "found", "");

        let visited = "https://www.linkedin.com/jobs/view/1234567890/?refId=abcdefgh&other=1";
        assert!(tracker.update_status(visited, "applied", "quick apply"));
        assert_eq!(tracker.rows()[0].status, "applied");
        assert_eq!(tracker.rows()[0].notes, "quick apply");
        assert!(tracker.already_applied(visited));
    }

    #[test]
    fn mark_cover_ready_records_file_and_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = Tracker::load(dir.path().join("tracker.csv")).unwrap();
        tracker.add_posting(&job("https://jobs.example.com/1"), 0, "found", "");

        assert!(tracker.mark_cover_ready("1", "1_acme.txt"));
        assert_eq!(tracker.rows()[0].status, "cover_ready");
        assert_eq!(tracker.rows()[0].cover_letter_file, "1_acme.txt");
        assert!(!tracker.mark_cover_ready("99", "x.txt"));
    }

    #[test]
    fn contains_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = Tracker::load(dir.path().join("tracker.csv")).unwrap();
        tracker.add_posting(&job("https://jobs.example.com/1"), 0, "found", "");
        assert!(tracker.contains("rust engineer", "ACME"));
        assert!(!tracker.contains("Go Engineer", "Acme"));
    }
}
