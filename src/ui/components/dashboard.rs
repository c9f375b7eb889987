use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use crate::session::result::SessionResult;
use crate::ui::layout::{draw_centered, row_from_center};
use crate::ui::theme::Theme;

/// Result screen for a completed attempt.
pub struct Dashboard<'a> {
    pub result: &'a SessionResult,
    pub theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(result: &'a SessionResult, theme: &'a Theme) -> Self {
        Self { result, theme }
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let result = self.result;
        let theme = self.theme;

        let accuracy_style = if result.accuracy >= 95.0 {
            theme.char_style(crate::session::state::CharClass::Correct)
        } else {
            theme.incorrect()
        };

        let lines = [
            (-8, "TEST COMPLETE".to_string(), theme.title()),
            (-6, format!("Source: {}", result.source_label), theme.dim()),
            (-3, format!("WPM: {:.1}", result.wpm), theme.accent()),
            (-1, format!("Accuracy: {:.1}%", result.accuracy), accuracy_style),
            (1, format!("Time: {:.1}s", result.elapsed_secs), theme.text()),
            (
                3,
                format!(
                    "Characters: {} (Errors: {})",
                    result.characters, result.error_count
                ),
                theme.text(),
            ),
            (6, "R: Retry  N: New Test  Q: Quit".to_string(), theme.dim()),
        ];

        for (offset, text, style) in lines {
            if let Some(y) = row_from_center(area, offset) {
                draw_centered(buf, area, y, &text, style);
            }
        }
    }
}
