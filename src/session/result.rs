use std::time::Instant;

use chrono::{DateTime, Local};

use crate::session::metrics;
use crate::session::state::{Phase, SessionState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Abandoned,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Completed => "completed",
            Outcome::Abandoned => "abandoned",
        }
    }
}

/// Immutable record of a finished attempt, handed to the result screen and
/// used by retry to rebuild the same session.
#[derive(Clone, Debug)]
pub struct SessionResult {
    pub outcome: Outcome,
    pub reference_text: String,
    pub user_input: String,
    pub source_label: String,
    pub characters: usize,
    pub error_count: usize,
    pub elapsed_secs: f64,
    pub wpm: f64,
    pub accuracy: f64,
    pub completion_percent: u16,
    pub timestamp: DateTime<Local>,
}

impl SessionResult {
    /// Snapshot a finished session. Returns `None` while it is still running.
    pub fn from_state(state: &SessionState) -> Option<Self> {
        Self::from_state_at(state, Instant::now())
    }

    pub fn from_state_at(state: &SessionState, now: Instant) -> Option<Self> {
        let outcome = match state.phase() {
            Phase::Completed => Outcome::Completed,
            Phase::Abandoned => Outcome::Abandoned,
            Phase::NotStarted | Phase::InProgress => return None,
        };

        let characters = state.input_len();
        let elapsed_secs = state.elapsed_secs_at(now);

        Some(Self {
            outcome,
            reference_text: state.reference_text().to_string(),
            user_input: state.input_text(),
            source_label: state.source_label().to_string(),
            characters,
            error_count: state.error_count(),
            elapsed_secs,
            wpm: metrics::wpm(characters, elapsed_secs),
            accuracy: metrics::accuracy(characters, state.error_count()),
            completion_percent: metrics::completion_percent(characters, state.reference_len()),
            timestamp: Local::now(),
        })
    }

    pub fn is_complete(&self) -> bool {
        self.outcome == Outcome::Completed
    }
}
