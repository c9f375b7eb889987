use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::metrics;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("reference text is empty")]
    EmptyReference,
}

/// Lifecycle of one typing attempt. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress,
    Completed,
    Abandoned,
}

impl Phase {
    pub fn is_finished(self) -> bool {
        matches!(self, Phase::Completed | Phase::Abandoned)
    }
}

/// How an Enter keystroke is scored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NewlinePolicy {
    /// Always append `\n` and score it like any other character.
    #[default]
    Score,
    /// Append `\n` only where the reference has one; otherwise drop the key.
    MatchReference,
}

impl NewlinePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            NewlinePolicy::Score => "score",
            NewlinePolicy::MatchReference => "match-reference",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharClass {
    Correct,
    Incorrect,
    Pending,
}

#[derive(Clone, Debug)]
pub struct SessionState {
    reference: Vec<char>,
    reference_text: String,
    input: Vec<char>,
    error_count: usize,
    phase: Phase,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    source_label: String,
    newline_policy: NewlinePolicy,
}

impl SessionState {
    pub fn new(text: &str, source_label: &str) -> Result<Self, SessionError> {
        if text.is_empty() {
            return Err(SessionError::EmptyReference);
        }
        Ok(Self {
            reference: text.chars().collect(),
            reference_text: text.to_string(),
            input: Vec::new(),
            error_count: 0,
            phase: Phase::NotStarted,
            started_at: None,
            finished_at: None,
            source_label: source_label.to_string(),
            newline_policy: NewlinePolicy::default(),
        })
    }

    pub fn with_newline_policy(mut self, policy: NewlinePolicy) -> Self {
        self.newline_policy = policy;
        self
    }

    /// Fresh attempt over the same text, as used by retry.
    pub fn restarted(&self) -> Self {
        Self {
            reference: self.reference.clone(),
            reference_text: self.reference_text.clone(),
            input: Vec::new(),
            error_count: 0,
            phase: Phase::NotStarted,
            started_at: None,
            finished_at: None,
            source_label: self.source_label.clone(),
            newline_policy: self.newline_policy,
        }
    }

    pub fn reference(&self) -> &[char] {
        &self.reference
    }

    pub fn reference_text(&self) -> &str {
        &self.reference_text
    }

    pub fn input(&self) -> &[char] {
        &self.input
    }

    pub fn input_text(&self) -> String {
        self.input.iter().collect()
    }

    pub fn reference_len(&self) -> usize {
        self.reference.len()
    }

    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    pub fn newline_policy(&self) -> NewlinePolicy {
        self.newline_policy
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<Instant> {
        self.finished_at
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    /// Seconds since the first keystroke, frozen at completion.
    pub fn elapsed_secs_at(&self, now: Instant) -> f64 {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.duration_since(start).as_secs_f64(),
            (Some(start), None) => now.saturating_duration_since(start).as_secs_f64(),
            _ => 0.0,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs_at(Instant::now())
    }

    /// Typing progress in `[0, 1]`, by code points.
    pub fn progress(&self) -> f64 {
        metrics::progress(self.input.len(), self.reference.len())
    }

    /// Classification of the typed character at `idx`.
    ///
    /// Anything past the end of the input is `Pending`; anything past the end
    /// of the reference is `Incorrect`.
    pub fn classify_input(&self, idx: usize) -> CharClass {
        match (self.input.get(idx), self.reference.get(idx)) {
            (None, _) => CharClass::Pending,
            (Some(typed), Some(expected)) if typed == expected => CharClass::Correct,
            (Some(_), _) => CharClass::Incorrect,
        }
    }

    /// Classification of the reference character at `idx` against the input.
    pub fn classify_reference(&self, idx: usize) -> CharClass {
        if idx >= self.reference.len() {
            return CharClass::Pending;
        }
        self.classify_input(idx)
    }

    pub(super) fn begin(&mut self, now: Instant) {
        if self.phase == Phase::NotStarted {
            self.phase = Phase::InProgress;
            self.started_at = Some(now);
        }
    }

    pub(super) fn push_input(&mut self, ch: char, mismatched: bool) {
        self.input.push(ch);
        if mismatched {
            self.error_count += 1;
        }
    }

    pub(super) fn pop_input(&mut self) -> Option<char> {
        self.input.pop()
    }

    pub(super) fn complete_if_matched(&mut self, now: Instant) -> bool {
        if self.phase == Phase::InProgress && self.input == self.reference {
            self.phase = Phase::Completed;
            self.finished_at = Some(now);
            return true;
        }
        false
    }

    pub(super) fn abandon(&mut self) {
        if !self.phase.is_finished() {
            self.phase = Phase::Abandoned;
        }
    }
}
