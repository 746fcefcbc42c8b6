use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while tracking problems.
#[derive(Debug, Error)]
pub enum GrindError {
    /// The problem file could not be opened, read or written.
    #[error("failed to access {}: {source}", path.display())]
    File {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    /// Terminal input or output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The problem file held something other than a valid collection.
    #[error("malformed problem file: {0}")]
    DataFormat(String),

    /// A rating outside red/yellow/green.
    #[error("invalid rating {0:?}, expected [r]ed, [y]ellow or [g]reen")]
    InvalidRating(String),
}

/// Outcome of an attempt. Doubles as the rating the user enters and as the
/// confidence stored on the record from its most recent attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Red,
    Yellow,
    Green,
}

impl Confidence {
    pub fn label(&self) -> &'static str {
        match self {
            Confidence::Red => "red",
            Confidence::Yellow => "yellow",
            Confidence::Green => "green",
        }
    }
}

impl std::str::FromStr for Confidence {
    type Err = GrindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" | "red" => Ok(Confidence::Red),
            "y" | "yellow" => Ok(Confidence::Yellow),
            "g" | "green" => Ok(Confidence::Green),
            other => Err(GrindError::InvalidRating(other.to_owned())),
        }
    }
}

/// Lifecycle position of a problem. A reviewable problem always carries its
/// due date, so "scheduled but not reviewable" cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    New,
    Reviewable { next_review: NaiveDate },
    Completed,
}

impl Status {
    /// The due date, for reviewable problems.
    pub fn next_review(&self) -> Option<NaiveDate> {
        match self {
            Status::Reviewable { next_review } => Some(*next_review),
            _ => None,
        }
    }
}

/// A single practice problem and its review schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    pub name: String,
    pub status: Status,
    pub confidence: Option<Confidence>,
    pub last_attempted: Option<NaiveDate>,
    pub notes: String,
}

impl Problem {
    /// A freshly seeded problem: new, never attempted, nothing scheduled.
    pub fn new(name: &str) -> Self {
        Problem {
            name: name.to_owned(),
            status: Status::New,
            confidence: None,
            last_attempted: None,
            notes: String::new(),
        }
    }
}

/// Durable round trip of the problem collection.
pub trait Store: std::fmt::Debug {
    /// Read the full collection.
    fn load(&self) -> Result<Vec<Problem>, GrindError>;

    /// Write the full collection, replacing previous content.
    fn save(&mut self, problems: &[Problem]) -> Result<(), GrindError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_parse() {
        assert_eq!("r".parse::<Confidence>().unwrap(), Confidence::Red);
        assert_eq!("red".parse::<Confidence>().unwrap(), Confidence::Red);
        assert_eq!("y".parse::<Confidence>().unwrap(), Confidence::Yellow);
        assert_eq!("yellow".parse::<Confidence>().unwrap(), Confidence::Yellow);
        assert_eq!("g".parse::<Confidence>().unwrap(), Confidence::Green);
        assert_eq!("green".parse::<Confidence>().unwrap(), Confidence::Green);
    }

    #[test]
    fn test_rating_parse_rejects_everything_else() {
        for bad in ["", "x", "gr", "GREEN", "blue"] {
            let err = bad.parse::<Confidence>().unwrap_err();
            assert!(matches!(err, GrindError::InvalidRating(ref s) if s == bad));
        }
    }

    #[test]
    fn test_fresh_problem_has_nothing_scheduled() {
        let p = Problem::new("Two Sum");
        assert_eq!(p.status, Status::New);
        assert_eq!(p.status.next_review(), None);
        assert_eq!(p.confidence, None);
        assert_eq!(p.last_attempted, None);
        assert!(p.notes.is_empty());
    }
}
