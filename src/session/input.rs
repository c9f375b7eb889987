use std::time::Instant;

use crate::session::state::{NewlinePolicy, Phase, SessionState};

/// One logical key event as the driver hands it to a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyInput {
    Character(char),
    Newline,
    Backspace,
    Cancel,
}

/// Immediate effect of a keystroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Correct,
    Incorrect,
    Erased,
    /// Enter pressed where the reference has no newline, under
    /// [`NewlinePolicy::MatchReference`].
    Suppressed,
    Cancelled,
    /// The session had already finished, or backspace on empty input.
    Ignored,
}

pub fn process_key(state: &mut SessionState, key: KeyInput) -> KeyOutcome {
    process_key_at(state, key, Instant::now())
}

/// Apply one key event at the given instant.
///
/// Finished sessions ignore every event.
pub fn process_key_at(state: &mut SessionState, key: KeyInput, now: Instant) -> KeyOutcome {
    if state.phase().is_finished() {
        return KeyOutcome::Ignored;
    }

    match key {
        KeyInput::Character(ch) => process_char(state, ch, now),
        KeyInput::Newline => process_newline(state, now),
        KeyInput::Backspace => process_backspace(state, now),
        KeyInput::Cancel => {
            state.abandon();
            KeyOutcome::Cancelled
        }
    }
}

fn process_char(state: &mut SessionState, ch: char, now: Instant) -> KeyOutcome {
    state.begin(now);

    // Index the character will land on; overflow past the reference is
    // always a mistake.
    let pos = state.input_len();
    let mismatched = state
        .reference()
        .get(pos)
        .is_none_or(|&expected| expected != ch);

    state.push_input(ch, mismatched);
    state.complete_if_matched(now);

    if mismatched {
        KeyOutcome::Incorrect
    } else {
        KeyOutcome::Correct
    }
}

fn process_newline(state: &mut SessionState, now: Instant) -> KeyOutcome {
    if state.newline_policy() == NewlinePolicy::MatchReference {
        let expected = state.reference().get(state.input_len()).copied();
        if expected != Some('\n') {
            state.begin(now);
            return KeyOutcome::Suppressed;
        }
    }
    process_char(state, '\n', now)
}

fn process_backspace(state: &mut SessionState, now: Instant) -> KeyOutcome {
    if state.phase() == Phase::NotStarted || state.pop_input().is_none() {
        return KeyOutcome::Ignored;
    }
    state.complete_if_matched(now);
    KeyOutcome::Erased
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn type_str(state: &mut SessionState, text: &str) {
        for ch in text.chars() {
            process_key(state, KeyInput::Character(ch));
        }
    }

    #[test]
    fn test_first_keystroke_starts_session() {
        let mut state = SessionState::new("abc", "x").unwrap();
        let t0 = Instant::now();
        assert_eq!(
            process_key_at(&mut state, KeyInput::Character('a'), t0),
            KeyOutcome::Correct
        );
        assert_eq!(state.phase(), Phase::InProgress);
        assert_eq!(state.started_at(), Some(t0));
    }

    #[test]
    fn test_backspace_before_start_is_ignored() {
        let mut state = SessionState::new("abc", "x").unwrap();
        assert_eq!(
            process_key(&mut state, KeyInput::Backspace),
            KeyOutcome::Ignored
        );
        assert_eq!(state.phase(), Phase::NotStarted);
        assert!(state.started_at().is_none());
    }

    #[test]
    fn test_cat_scenario() {
        let mut state = SessionState::new("cat", "x").unwrap();
        let keys = [
            KeyInput::Character('c'),
            KeyInput::Character('a'),
            KeyInput::Character('x'),
            KeyInput::Backspace,
            KeyInput::Character('t'),
        ];
        for key in keys {
            process_key(&mut state, key);
        }
        assert_eq!(state.input_text(), "cat");
        assert_eq!(state.error_count(), 1);
        assert_eq!(state.phase(), Phase::Completed);
        let start = state.started_at().unwrap();
        let end = state.finished_at().unwrap();
        assert!(end >= start);
    }

    #[test]
    fn test_completion_ends_event_processing() {
        let mut state = SessionState::new("ab", "x").unwrap();
        type_str(&mut state, "ab");
        assert_eq!(state.phase(), Phase::Completed);
        assert_eq!(
            process_key(&mut state, KeyInput::Character('c')),
            KeyOutcome::Ignored
        );
        assert_eq!(state.input_text(), "ab");
        assert_eq!(state.error_count(), 0);
    }

    #[test]
    fn test_overflow_counts_and_blocks_completion() {
        let mut state = SessionState::new("ab", "x").unwrap();
        type_str(&mut state, "axc");
        assert_eq!(state.input_text(), "axc");
        assert_eq!(state.error_count(), 2);
        assert_eq!(state.phase(), Phase::InProgress);

        process_key(&mut state, KeyInput::Backspace);
        assert_eq!(state.phase(), Phase::InProgress);
        process_key(&mut state, KeyInput::Backspace);
        process_key(&mut state, KeyInput::Character('b'));
        assert_eq!(state.input_text(), "ab");
        assert_eq!(state.error_count(), 2);
        assert_eq!(state.phase(), Phase::Completed);
    }

    #[test]
    fn test_overflow_is_always_an_error() {
        let mut state = SessionState::new("a", "x").unwrap();
        type_str(&mut state, "b");
        assert_eq!(
            process_key(&mut state, KeyInput::Character('a')),
            KeyOutcome::Incorrect
        );
        assert_eq!(state.error_count(), 2);
    }

    #[test]
    fn test_backspace_never_lowers_errors() {
        let mut state = SessionState::new("abc", "x").unwrap();
        type_str(&mut state, "xy");
        assert_eq!(state.error_count(), 2);
        process_key(&mut state, KeyInput::Backspace);
        process_key(&mut state, KeyInput::Backspace);
        assert_eq!(state.input_len(), 0);
        assert_eq!(state.error_count(), 2);
        assert_eq!(
            process_key(&mut state, KeyInput::Backspace),
            KeyOutcome::Ignored
        );
    }

    #[test]
    fn test_error_count_matches_mismatched_appends() {
        let reference = "the cat sat";
        let keys: Vec<KeyInput> = "thx\u{8}e cat sqq\u{8}\u{8}at!!"
            .chars()
            .map(|c| {
                if c == '\u{8}' {
                    KeyInput::Backspace
                } else {
                    KeyInput::Character(c)
                }
            })
            .collect();

        let mut state = SessionState::new(reference, "x").unwrap();
        let mut expected_errors = 0;
        let mut shadow: Vec<char> = Vec::new();
        let target: Vec<char> = reference.chars().collect();
        for key in keys {
            match key {
                KeyInput::Character(c) => {
                    if state.is_finished() {
                        break;
                    }
                    let pos = shadow.len();
                    if target.get(pos) != Some(&c) {
                        expected_errors += 1;
                    }
                    shadow.push(c);
                }
                KeyInput::Backspace => {
                    shadow.pop();
                }
                _ => {}
            }
            process_key(&mut state, key);
        }
        assert_eq!(state.error_count(), expected_errors);
        assert_eq!(state.error_count(), 3);
        assert_eq!(state.phase(), Phase::Completed);
    }

    #[test]
    fn test_newline_scored_against_reference() {
        let mut state = SessionState::new("ab\ncd", "x").unwrap();
        type_str(&mut state, "ab");
        assert_eq!(
            process_key(&mut state, KeyInput::Newline),
            KeyOutcome::Correct
        );
        type_str(&mut state, "cd");
        assert_eq!(state.phase(), Phase::Completed);
        assert_eq!(state.error_count(), 0);
    }

    #[test]
    fn test_stray_newline_is_an_error_when_scored() {
        let mut state = SessionState::new("abc", "x").unwrap();
        process_key(&mut state, KeyInput::Character('a'));
        assert_eq!(
            process_key(&mut state, KeyInput::Newline),
            KeyOutcome::Incorrect
        );
        assert_eq!(state.input_text(), "a\n");
        assert_eq!(state.error_count(), 1);
    }

    #[test]
    fn test_stray_newline_is_dropped_when_matching_reference() {
        let mut state = SessionState::new("abc", "x")
            .unwrap()
            .with_newline_policy(NewlinePolicy::MatchReference);
        process_key(&mut state, KeyInput::Character('a'));
        assert_eq!(
            process_key(&mut state, KeyInput::Newline),
            KeyOutcome::Suppressed
        );
        assert_eq!(state.input_text(), "a");
        assert_eq!(state.error_count(), 0);
    }

    #[test]
    fn test_matching_newline_is_kept_when_matching_reference() {
        let mut state = SessionState::new("a\nb", "x")
            .unwrap()
            .with_newline_policy(NewlinePolicy::MatchReference);
        process_key(&mut state, KeyInput::Character('a'));
        assert_eq!(
            process_key(&mut state, KeyInput::Newline),
            KeyOutcome::Correct
        );
        process_key(&mut state, KeyInput::Character('b'));
        assert_eq!(state.phase(), Phase::Completed);
    }

    #[test]
    fn test_suppressed_newline_still_starts_the_clock() {
        let mut state = SessionState::new("abc", "x")
            .unwrap()
            .with_newline_policy(NewlinePolicy::MatchReference);
        process_key(&mut state, KeyInput::Newline);
        assert_eq!(state.phase(), Phase::InProgress);
        assert_eq!(state.input_len(), 0);
    }

    #[test]
    fn test_newline_can_complete() {
        let mut state = SessionState::new("a\n", "x").unwrap();
        process_key(&mut state, KeyInput::Character('a'));
        process_key(&mut state, KeyInput::Newline);
        assert_eq!(state.phase(), Phase::Completed);
    }

    #[test]
    fn test_cancel_abandons_without_touching_timestamps() {
        let mut state = SessionState::new("abc", "x").unwrap();
        let t0 = Instant::now();
        process_key_at(&mut state, KeyInput::Character('a'), t0);
        assert_eq!(
            process_key_at(&mut state, KeyInput::Cancel, t0 + Duration::from_secs(2)),
            KeyOutcome::Cancelled
        );
        assert_eq!(state.phase(), Phase::Abandoned);
        assert_eq!(state.started_at(), Some(t0));
        assert!(state.finished_at().is_none());
        assert_eq!(
            process_key(&mut state, KeyInput::Character('b')),
            KeyOutcome::Ignored
        );
    }

    #[test]
    fn test_cancel_before_start() {
        let mut state = SessionState::new("abc", "x").unwrap();
        process_key(&mut state, KeyInput::Cancel);
        assert_eq!(state.phase(), Phase::Abandoned);
        assert!(!state.is_started());
    }

    #[test]
    fn test_multibyte_comparison_by_code_point() {
        let mut state = SessionState::new("日本", "x").unwrap();
        type_str(&mut state, "日本");
        assert_eq!(state.phase(), Phase::Completed);
        assert_eq!(state.error_count(), 0);
    }
}
