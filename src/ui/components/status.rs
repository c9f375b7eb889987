use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use crate::ui::layout::{draw_centered, row_from_center, truncate_to_width};
use crate::ui::theme::Theme;

/// Status-only screen for viewports too small for the session layout.
pub struct MinimalScreen<'a> {
    /// Live WPM once the attempt has started.
    pub wpm: Option<f64>,
    pub theme: &'a Theme,
}

impl<'a> MinimalScreen<'a> {
    pub fn new(wpm: Option<f64>, theme: &'a Theme) -> Self {
        Self { wpm, theme }
    }
}

impl Widget for MinimalScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (width, height) = (area.width, area.height);
        if height > 0 {
            let title = truncate_to_width("KEYSMASH", usize::from(width));
            draw_centered(buf, area, 0, &title, self.theme.title());
        }
        if height > 2 && width > 15 {
            draw_centered(buf, area, 2, "Window too small", self.theme.incorrect());
        }
        if let Some(wpm) = self.wpm {
            let stats = format!("WPM:{wpm:.1}");
            if height > 4 && usize::from(width) > stats.len() + 2 {
                draw_centered(buf, area, 4, &stats, self.theme.text());
            }
        }
        if height > 6 && width > 15 {
            draw_centered(buf, area, 6, "ESC to quit", self.theme.dim());
        }
    }
}

/// Shown when no passage could be loaded.
pub struct ErrorScreen<'a> {
    pub message: &'a str,
    pub theme: &'a Theme,
}

impl<'a> ErrorScreen<'a> {
    pub fn new(message: &'a str, theme: &'a Theme) -> Self {
        Self { message, theme }
    }
}

impl Widget for ErrorScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = [
            (-4, "ERROR", self.theme.incorrect()),
            (0, self.message, self.theme.text()),
            (4, "Press any key to retry, ESC to quit", self.theme.dim()),
        ];
        for (offset, text, style) in lines {
            if let Some(y) = row_from_center(area, offset) {
                draw_centered(buf, area, y, text, style);
            }
        }
    }
}
