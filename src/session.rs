use crate::algorithm::{apply_rating, select_next, Selection, SessionState};
use crate::traits::{Confidence, Problem};
use chrono::NaiveDate;

/*
Implements the generic flow;
    Main flow;
        Load collection

        Select candidate (pure peek)
        Present problem, maybe take a note
        Obtain rating

        On a valid rating: reschedule, mark consumed

        Go to select candidate.

    Save collection.
*/

/// One practice run: the collection, today's date and the per-run
/// accumulator.
#[derive(Debug)]
pub struct Session {
    problems: Vec<Problem>,
    today: NaiveDate,
    state: SessionState,
}

impl Session {
    pub fn new(problems: Vec<Problem>, today: NaiveDate) -> Self {
        Session {
            problems,
            today,
            state: SessionState::new(),
        }
    }

    /// Peek at the next candidate. Consumes nothing, so a selection that is
    /// abandoned (say, after an invalid rating) is offered again.
    pub fn select(&self) -> Option<Selection> {
        select_next(&self.problems, self.today, &self.state)
    }

    pub fn problem(&self, selection: Selection) -> &Problem {
        &self.problems[selection.index]
    }

    /// Apply a rating to a selection and consume it.
    pub fn rate(&mut self, selection: Selection, rating: Confidence) {
        let problem = &mut self.problems[selection.index];
        apply_rating(problem, rating, self.today);
        let name = problem.name.clone();
        self.state.consume(&name, selection.pool);
    }

    /// Append a line to the selected problem's notes.
    pub fn append_note(&mut self, selection: Selection, note: &str) {
        let notes = &mut self.problems[selection.index].notes;
        if !notes.is_empty() {
            notes.push('\n');
        }
        notes.push_str(note);
    }

    /// Problems rated so far this run.
    pub fn rated_count(&self) -> usize {
        self.state.rated_count()
    }

    /// Hand the collection back for persisting.
    pub fn into_problems(self) -> Vec<Problem> {
        self.problems
    }
}
