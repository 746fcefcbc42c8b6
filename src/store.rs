// Store implementations over the flat problem file.

use crate::traits::{Confidence, GrindError, Problem, Status, Store};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Store that only keeps the collection in memory. Useful on its own when
/// exercising the session without touching the disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    problems: Vec<Problem>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore { problems: vec![] }
    }

    pub fn from(problems: &[Problem]) -> Self {
        MemoryStore {
            problems: problems.to_vec(),
        }
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Vec<Problem>, GrindError> {
        Ok(self.problems.clone())
    }

    fn save(&mut self, problems: &[Problem]) -> Result<(), GrindError> {
        self.problems = problems.to_vec();
        Ok(())
    }
}

/// Representation on disk. Very much intended to be machine readable only;
/// dates travel as ISO `YYYY-MM-DD` strings, absent values as null.
#[derive(Debug, Deserialize, Serialize)]
struct StoredProblem {
    name: String,
    status: StoredStatus,
    confidence: Option<Confidence>,
    last_attempted: Option<NaiveDate>,
    notes: String,
    next_review: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
enum StoredStatus {
    New,
    Reviewable,
    Completed,
}

impl StoredProblem {
    fn into_problem(self) -> Result<Problem, GrindError> {
        let status = match (self.status, self.next_review) {
            (StoredStatus::Reviewable, Some(next_review)) => Status::Reviewable { next_review },
            (StoredStatus::Reviewable, None) => {
                return Err(GrindError::DataFormat(format!(
                    "problem {:?} is reviewable but has no next_review date",
                    self.name
                )))
            }
            (StoredStatus::New, None) => Status::New,
            (StoredStatus::Completed, None) => Status::Completed,
            (_, Some(_)) => {
                return Err(GrindError::DataFormat(format!(
                    "problem {:?} has a next_review date but is not reviewable",
                    self.name
                )))
            }
        };
        Ok(Problem {
            name: self.name,
            status,
            confidence: self.confidence,
            last_attempted: self.last_attempted,
            notes: self.notes,
        })
    }

    fn from_problem(problem: &Problem) -> Self {
        let (status, next_review) = match problem.status {
            Status::New => (StoredStatus::New, None),
            Status::Reviewable { next_review } => (StoredStatus::Reviewable, Some(next_review)),
            Status::Completed => (StoredStatus::Completed, None),
        };
        StoredProblem {
            name: problem.name.clone(),
            status,
            confidence: problem.confidence,
            last_attempted: problem.last_attempted,
            notes: problem.notes.clone(),
            next_review,
        }
    }
}

/// A store that reads and writes a flat JSON file, an array of one object
/// per problem.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for JsonStore {
    fn load(&self) -> Result<Vec<Problem>, GrindError> {
        let file = std::fs::File::open(&self.path).map_err(|source| GrindError::File {
            path: self.path.clone(),
            source,
        })?;
        let stored: Vec<StoredProblem> = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| GrindError::DataFormat(format!("{}: {e}", self.path.display())))?;
        stored.into_iter().map(StoredProblem::into_problem).collect()
    }

    fn save(&mut self, problems: &[Problem]) -> Result<(), GrindError> {
        use std::fs::OpenOptions;
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|source| GrindError::File {
                path: self.path.clone(),
                source,
            })?;
        let stored: Vec<StoredProblem> = problems.iter().map(StoredProblem::from_problem).collect();
        serde_json::to_writer_pretty(file, &stored).map_err(|source| GrindError::File {
            path: self.path.clone(),
            source: source.into(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Problem> {
        vec![
            Problem::new("Two Sum"),
            Problem {
                status: Status::Reviewable {
                    next_review: date(2024, 1, 8),
                },
                confidence: Some(Confidence::Yellow),
                last_attempted: Some(date(2024, 1, 5)),
                notes: "sliding window".to_owned(),
                ..Problem::new("Longest Substring")
            },
            Problem {
                status: Status::Completed,
                confidence: Some(Confidence::Green),
                last_attempted: Some(date(2024, 1, 2)),
                ..Problem::new("Valid Parentheses")
            },
        ]
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::new(dir.path().join("problems.json"));
        let problems = sample();
        store.save(&problems).unwrap();
        assert_eq!(store.load().unwrap(), problems);
    }

    #[test]
    fn test_absent_dates_serialize_as_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("problems.json");
        let mut store = JsonStore::new(&path);
        store.save(&[Problem::new("Two Sum")]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"next_review\": null"));
        assert!(text.contains("\"last_attempted\": null"));
        assert!(text.contains("\"confidence\": null"));
    }

    #[test]
    fn test_dates_serialize_as_iso_strings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("problems.json");
        let mut store = JsonStore::new(&path);
        store.save(&sample()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"next_review\": \"2024-01-08\""));
        assert!(text.contains("\"last_attempted\": \"2024-01-05\""));
    }

    #[test]
    fn test_missing_file_is_a_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nope.json"));
        let err = store.load().unwrap_err();
        assert!(matches!(err, GrindError::File { .. }));
    }

    #[test]
    fn test_rejects_unstructured_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("problems.json");
        std::fs::write(&path, "not a problem collection").unwrap();
        let err = JsonStore::new(&path).load().unwrap_err();
        assert!(matches!(err, GrindError::DataFormat(_)));
    }

    #[test]
    fn test_rejects_invalid_date_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("problems.json");
        std::fs::write(
            &path,
            r#"[{"name": "A", "status": "reviewable", "confidence": "red",
                "last_attempted": null, "notes": "", "next_review": "soon"}]"#,
        )
        .unwrap();
        let err = JsonStore::new(&path).load().unwrap_err();
        assert!(matches!(err, GrindError::DataFormat(_)));
    }

    #[test]
    fn test_rejects_reviewable_without_a_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("problems.json");
        std::fs::write(
            &path,
            r#"[{"name": "A", "status": "reviewable", "confidence": null,
                "last_attempted": null, "notes": "", "next_review": null}]"#,
        )
        .unwrap();
        let err = JsonStore::new(&path).load().unwrap_err();
        assert!(matches!(err, GrindError::DataFormat(_)));
    }

    #[test]
    fn test_rejects_scheduled_non_reviewable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("problems.json");
        std::fs::write(
            &path,
            r#"[{"name": "A", "status": "completed", "confidence": "green",
                "last_attempted": "2024-01-02", "notes": "", "next_review": "2024-01-09"}]"#,
        )
        .unwrap();
        let err = JsonStore::new(&path).load().unwrap_err();
        assert!(matches!(err, GrindError::DataFormat(_)));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        let problems = sample();
        store.save(&problems).unwrap();
        assert_eq!(store.load().unwrap(), problems);
    }
}
