use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use crate::ui::layout::{draw_centered, row_from_center};
use crate::ui::theme::Theme;

/// Welcome screen shown before each new test.
pub struct Menu<'a> {
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = [
            (-3, "KEYSMASH", self.theme.title()),
            (-1, "TYPING TEST", self.theme.accent()),
            (3, "Press any key to start, ESC to quit", self.theme.dim()),
        ];
        for (offset, text, style) in lines {
            if let Some(y) = row_from_center(area, offset) {
                draw_centered(buf, area, y, text, style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_lines_are_centred() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 50, 20);
        let mut buf = Buffer::empty(area);
        Menu::new(&theme).render(area, &mut buf);
        let row = |y: u16| -> String { (0..50).map(|x| buf[(x, y)].symbol().to_string()).collect() };
        assert_eq!(row(7), format!("{}KEYSMASH{}", " ".repeat(21), " ".repeat(21)));
        assert_eq!(row(9).trim(), "TYPING TEST");
        assert_eq!(row(13).trim(), "Press any key to start, ESC to quit");
    }
}
