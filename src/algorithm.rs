// Selection policy and the rating state machine.
//
// Both are pure over (collection, today, accumulator); the caller owns all
// mutation ordering, so nothing here is consumed until a rating lands.

use crate::traits::{Confidence, Problem, Status};
use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

/// Review offsets in days for each rating.
const GREEN_OFFSET: i64 = 7;
const YELLOW_OFFSET: i64 = 3;
const RED_OFFSET: i64 = 1;

/// Due reviews surfaced per run before new problems take precedence.
const REVIEWS_BEFORE_NEW: usize = 1;

/// Which pool a selection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    DueReview,
    Fresh,
}

/// A selected problem: its position in the collection and the pool it came
/// from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    pub pool: Pool,
}

/// Accumulator threaded through one run: the names already consumed and how
/// many due reviews were among them.
#[derive(Debug, Default, Clone)]
pub struct SessionState {
    used_names: HashSet<String>,
    reviews_given: usize,
}

impl SessionState {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used_names.contains(name)
    }

    pub fn reviews_given(&self) -> usize {
        self.reviews_given
    }

    /// Problems consumed so far.
    pub fn rated_count(&self) -> usize {
        self.used_names.len()
    }

    /// Mark a selection as consumed by a valid rating.
    pub fn consume(&mut self, name: &str, pool: Pool) {
        self.used_names.insert(name.to_owned());
        if pool == Pool::DueReview {
            self.reviews_given += 1;
        }
    }
}

/// Pick the next problem to offer, or `None` once the run is exhausted.
///
/// Due reviews go first, earliest due date first, but only one per run
/// while new problems remain; once the new pool is empty the remaining
/// due reviews are offered.
pub fn select_next(
    problems: &[Problem],
    today: NaiveDate,
    state: &SessionState,
) -> Option<Selection> {
    let mut due: Vec<(usize, NaiveDate)> = problems
        .iter()
        .enumerate()
        .filter(|(_, p)| !state.is_used(&p.name))
        .filter_map(|(i, p)| match p.status {
            Status::Reviewable { next_review } if next_review <= today => Some((i, next_review)),
            _ => None,
        })
        .collect();
    // Stable, so ties keep collection order.
    due.sort_by_key(|&(_, next_review)| next_review);

    let fresh = problems
        .iter()
        .enumerate()
        .find(|(_, p)| p.status == Status::New && !state.is_used(&p.name))
        .map(|(i, _)| i);

    if state.reviews_given() < REVIEWS_BEFORE_NEW {
        if let Some(&(index, _)) = due.first() {
            return Some(Selection {
                index,
                pool: Pool::DueReview,
            });
        }
    }
    if let Some(index) = fresh {
        return Some(Selection {
            index,
            pool: Pool::Fresh,
        });
    }
    due.first().map(|&(index, _)| Selection {
        index,
        pool: Pool::DueReview,
    })
}

/// Apply a rating: move the problem through its lifecycle, reschedule per
/// the fixed offsets and stamp the attempt date.
pub fn apply_rating(problem: &mut Problem, rating: Confidence, today: NaiveDate) {
    problem.status = match (problem.status, rating) {
        // Terminal, nothing reschedules it.
        (Status::Completed, _) => Status::Completed,
        (Status::Reviewable { .. }, Confidence::Green) => Status::Completed,
        (Status::New, Confidence::Green) => Status::Reviewable {
            next_review: today + Duration::days(GREEN_OFFSET),
        },
        (_, Confidence::Yellow) => Status::Reviewable {
            next_review: today + Duration::days(YELLOW_OFFSET),
        },
        (_, Confidence::Red) => Status::Reviewable {
            next_review: today + Duration::days(RED_OFFSET),
        },
    };
    problem.confidence = Some(rating);
    problem.last_attempted = Some(today);
}
