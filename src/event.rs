use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent};

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    Resize(u16, u16),
}

/// Blocking pull of terminal events on the caller's thread.
///
/// `next` waits at most one tick; with nothing to read it reports a
/// [`AppEvent::Tick`] so the caller can redraw timers and the cursor.
pub struct EventSource {
    tick_rate: Duration,
}

impl EventSource {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        loop {
            if !event::poll(self.tick_rate)? {
                return Ok(AppEvent::Tick);
            }
            match event::read()? {
                Event::Key(key) => return Ok(AppEvent::Key(key)),
                Event::Resize(w, h) => return Ok(AppEvent::Resize(w, h)),
                // Mouse, focus and paste events carry nothing for a typing test.
                _ => continue,
            }
        }
    }
}
