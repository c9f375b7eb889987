use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::Config;
use crate::corpus::TextProvider;
use crate::engine::layout::{LayoutResult, Viewport, compute_layout};
use crate::session::input::{self, KeyInput, KeyOutcome};
use crate::session::metrics::LiveStats;
use crate::session::result::{Outcome, SessionResult};
use crate::session::state::{Phase, SessionState};
use crate::ui::theme::Theme;

const CURSOR_BLINK: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Welcome,
    Session,
    Result,
    Error,
}

pub struct App {
    pub screen: AppScreen,
    pub session: Option<SessionState>,
    pub last_result: Option<SessionResult>,
    pub error_message: Option<String>,
    pub theme: Theme,
    pub config: Config,
    pub should_quit: bool,
    provider: Box<dyn TextProvider>,
    blink_epoch: Instant,
}

impl App {
    pub fn new(config: Config, theme: Theme, provider: Box<dyn TextProvider>) -> Self {
        Self {
            screen: AppScreen::Welcome,
            session: None,
            last_result: None,
            error_message: None,
            theme,
            config,
            should_quit: false,
            provider,
            blink_epoch: Instant::now(),
        }
    }

    /// Load a fresh passage and begin a session, or show why we could not.
    pub fn start_new_test(&mut self) {
        match self.provider.next_text() {
            Ok(passage) => match SessionState::new(&passage.text, &passage.source) {
                Ok(state) => {
                    tracing::info!(
                        target: "session",
                        source = %passage.source,
                        chars = state.reference_len(),
                        policy = self.config.newline_policy.as_str(),
                        "session_start"
                    );
                    self.begin(state.with_newline_policy(self.config.newline_policy));
                }
                Err(err) => self.show_error(format!("Error loading test: {err}")),
            },
            Err(err) => self.show_error(format!("Error loading test: {err}")),
        }
    }

    /// Same text again, with input, errors and timing reset.
    pub fn retry(&mut self) {
        let Some(state) = self.session.as_ref().map(SessionState::restarted) else {
            self.start_new_test();
            return;
        };
        tracing::info!(target: "session", source = state.source_label(), "session_retry");
        self.begin(state);
    }

    fn begin(&mut self, state: SessionState) {
        self.session = Some(state);
        self.last_result = None;
        self.error_message = None;
        self.blink_epoch = Instant::now();
        self.screen = AppScreen::Session;
    }

    fn show_error(&mut self, message: String) {
        tracing::warn!(target: "session", %message, "load_failed");
        self.error_message = Some(message);
        self.screen = AppScreen::Error;
    }

    pub fn go_to_welcome(&mut self) {
        self.screen = AppScreen::Welcome;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Feed one key to the running session and move on when it finishes.
    pub fn apply_key(&mut self, key: KeyInput) -> KeyOutcome {
        let Some(state) = self.session.as_mut() else {
            return KeyOutcome::Ignored;
        };
        let outcome = input::process_key(state, key);
        tracing::trace!(target: "session", ?key, ?outcome, "key");

        if !state.is_finished() {
            return outcome;
        }
        let Some(result) = SessionResult::from_state(state) else {
            return outcome;
        };
        tracing::info!(
            target: "session",
            outcome = result.outcome.as_str(),
            wpm = result.wpm,
            accuracy = result.accuracy,
            errors = result.error_count,
            elapsed_secs = result.elapsed_secs,
            "session_end"
        );
        self.screen = match result.outcome {
            Outcome::Completed => AppScreen::Result,
            Outcome::Abandoned => AppScreen::Welcome,
        };
        self.last_result = Some(result);
        outcome
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        match self.screen {
            AppScreen::Welcome => match key.code {
                KeyCode::Esc => self.quit(),
                _ => self.start_new_test(),
            },
            AppScreen::Session => {
                if let Some(input) = key_input(&key) {
                    self.apply_key(input);
                }
            }
            AppScreen::Result => match key.code {
                KeyCode::Char('r' | 'R') => self.retry(),
                KeyCode::Char('n' | 'N') => self.start_new_test(),
                KeyCode::Char('q' | 'Q') | KeyCode::Esc => self.quit(),
                _ => {}
            },
            AppScreen::Error => match key.code {
                KeyCode::Esc => self.quit(),
                _ => self.start_new_test(),
            },
        }
    }

    pub fn layout(&self, viewport: Viewport) -> Option<LayoutResult> {
        self.session
            .as_ref()
            .map(|state| compute_layout(state, viewport, &self.config.layout))
    }

    /// Live figures for the status line, once the first key is in.
    pub fn live_stats(&self, now: Instant) -> Option<LiveStats> {
        self.session
            .as_ref()
            .filter(|state| state.phase() != Phase::NotStarted)
            .map(|state| LiveStats::at(state, now))
    }

    pub fn cursor_on(&self, now: Instant) -> bool {
        let phase = now.saturating_duration_since(self.blink_epoch).as_millis() / CURSOR_BLINK.as_millis();
        phase % 2 == 0
    }
}

/// Map a terminal key press to a session key. `None` for keys a typing
/// test does not use.
pub fn key_input(key: &KeyEvent) -> Option<KeyInput> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    match key.code {
        KeyCode::Char(ch) => Some(KeyInput::Character(ch)),
        KeyCode::Tab => Some(KeyInput::Character('\t')),
        KeyCode::Enter => Some(KeyInput::Newline),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Esc => Some(KeyInput::Cancel),
        _ => None,
    }
}
