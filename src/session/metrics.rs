//! Speed and accuracy figures derived from session counts.
//!
//! Everything here is a pure function of its arguments. Degenerate
//! denominators resolve to fixed defaults instead of errors.

use std::time::Instant;

use crate::session::state::SessionState;

const AVERAGE_WORD_LENGTH: f64 = 5.0;

/// Words per minute, counting five characters as one word.
///
/// Zero for the first second after the start, and whenever the raw figure
/// would be negative or not finite.
pub fn wpm(char_count: usize, elapsed_secs: f64) -> f64 {
    if elapsed_secs < 1.0 {
        return 0.0;
    }
    let value = (char_count as f64 / AVERAGE_WORD_LENGTH) / (elapsed_secs / 60.0);
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}

/// Share of keystrokes that were not mistakes, in percent.
pub fn accuracy(input_len: usize, error_count: usize) -> f64 {
    if input_len == 0 {
        return 100.0;
    }
    (100.0 * (1.0 - error_count as f64 / input_len as f64)).clamp(0.0, 100.0)
}

/// Whole-number percentage of the reference covered by input, capped at 100.
pub fn completion_percent(input_len: usize, reference_len: usize) -> u16 {
    if reference_len == 0 {
        return 0;
    }
    (input_len.saturating_mul(100) / reference_len).min(100) as u16
}

/// Fraction of the reference covered by input, in `[0, 1]`.
pub fn progress(input_len: usize, reference_len: usize) -> f64 {
    if reference_len == 0 {
        return 0.0;
    }
    (input_len as f64 / reference_len as f64).clamp(0.0, 1.0)
}

/// Live figures for one frame of a running session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiveStats {
    pub elapsed_secs: f64,
    pub wpm: f64,
    pub accuracy: f64,
    pub errors: usize,
    pub completion_percent: u16,
}

impl LiveStats {
    pub fn at(state: &SessionState, now: Instant) -> Self {
        let elapsed_secs = state.elapsed_secs_at(now);
        Self {
            elapsed_secs,
            wpm: wpm(state.input_len(), elapsed_secs),
            accuracy: accuracy(state.input_len(), state.error_count()),
            errors: state.error_count(),
            completion_percent: completion_percent(state.input_len(), state.reference_len()),
        }
    }
}
