use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use crate::ui::layout::{draw_centered, draw_text};
use crate::ui::theme::Theme;

const MAX_BAR_WIDTH: u16 = 60;
const MIN_BAR_WIDTH: u16 = 10;

/// One-row `[=====     ] 42%` bar; just `42%` when there is no room.
pub struct ProgressBar<'a> {
    pub percent: u16,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(percent: u16, theme: &'a Theme) -> Self {
        Self {
            percent: percent.min(100),
            theme,
        }
    }

    /// Number of `=`/space cells between the brackets for a given row width.
    pub fn bar_width(area_width: u16, percent: u16) -> Option<u16> {
        let suffix = format!("] {percent}%");
        let room = area_width.saturating_sub(1 + suffix.len() as u16);
        let width = room.min(MAX_BAR_WIDTH);
        (width >= MIN_BAR_WIDTH).then_some(width)
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let label = format!("{}%", self.percent);

        let Some(width) = Self::bar_width(area.width, self.percent) else {
            draw_centered(buf, area, 0, &label, self.theme.text());
            return;
        };

        let filled = width * self.percent / 100;
        let bar = format!(
            "{}{}",
            "=".repeat(usize::from(filled)),
            " ".repeat(usize::from(width - filled))
        );
        draw_text(buf, area, 0, 0, "[", self.theme.dim());
        draw_text(buf, area, 1, 0, &bar, self.theme.accent());
        draw_text(buf, area, 1 + width, 0, &format!("] {label}"), self.theme.text());
    }
}
