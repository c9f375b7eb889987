use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::widgets::Widget;

use crate::engine::layout::{SessionLayout, WrappedRegion};
use crate::engine::width::char_width;
use crate::session::metrics::LiveStats;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::layout::{draw_centered, draw_text};
use crate::ui::theme::Theme;

/// The whole session screen, painted from a precomputed layout.
pub struct TypingArea<'a> {
    layout: &'a SessionLayout,
    stats: Option<LiveStats>,
    source: &'a str,
    theme: &'a Theme,
    cursor_on: bool,
}

impl<'a> TypingArea<'a> {
    pub fn new(layout: &'a SessionLayout, source: &'a str, theme: &'a Theme) -> Self {
        Self {
            layout,
            stats: None,
            source,
            theme,
            cursor_on: true,
        }
    }

    /// Live figures; omitted until the first keystroke.
    pub fn stats(mut self, stats: Option<LiveStats>) -> Self {
        self.stats = stats;
        self
    }

    /// Blink phase: a reversed block when on, an underscore when off.
    pub fn cursor_on(mut self, on: bool) -> Self {
        self.cursor_on = on;
        self
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let rows = &self.layout.rows;
        if self.layout.tier.shows_source() {
            draw_centered(buf, area, rows.title, "KEYSMASH - TYPING TEST", self.theme.title());
            if let Some(y) = rows.source {
                let source = format!("Source: {}", self.source);
                draw_centered(buf, area, y, &source, self.theme.dim());
            }
        } else {
            draw_centered(buf, area, rows.title, "KEYSMASH", self.theme.title());
        }
    }

    fn render_stats(&self, area: Rect, buf: &mut Buffer) {
        let Some(stats) = self.stats else {
            return;
        };
        let rows = &self.layout.rows;
        if self.layout.tier.detailed_stats() {
            let line = format!(
                "Time: {:.1}s | WPM: {:.1} | Errors: {}",
                stats.elapsed_secs, stats.wpm, stats.errors
            );
            draw_centered(buf, area, rows.stats, &line, self.theme.text());
            if let Some(y) = rows.stats_progress {
                let progress = format!("Progress: {}%", stats.completion_percent);
                draw_text(buf, area, self.layout.padding, y, &progress, self.theme.dim());
            }
        } else {
            let line = format!("WPM: {:.1} | Err: {}", stats.wpm, stats.errors);
            draw_centered(buf, area, rows.stats, &line, self.theme.text());
        }
    }

    fn render_region(&self, region: &WrappedRegion, start_y: u16, rows: u16, area: Rect, buf: &mut Buffer) {
        for (offset, line, classes) in region.rows() {
            let y = start_y + offset;
            let mut x = self.layout.padding;
            for ((ch, _), class) in line.glyphs().zip(classes) {
                let mut glyph = [0u8; 4];
                draw_text(buf, area, x, y, ch.encode_utf8(&mut glyph), self.theme.char_style(*class));
                x += char_width(ch) as u16;
            }
        }

        if let Some(col) = self.layout.indicator_column() {
            if region.more_above() {
                draw_text(buf, area, col, start_y, "↑", self.theme.accent());
            }
            if region.more_below() && rows > 0 {
                draw_text(buf, area, col, start_y + rows - 1, "↓", self.theme.accent());
            }
        }
    }

    fn render_cursor(&self, area: Rect, buf: &mut Buffer) {
        let Some((x, y)) = self.layout.cursor_cell() else {
            return;
        };
        if self.cursor_on {
            draw_text(
                buf,
                area,
                x,
                y,
                " ",
                self.theme.cursor().add_modifier(Modifier::REVERSED),
            );
        } else {
            draw_text(buf, area, x, y, "_", self.theme.cursor());
        }
    }
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = self.layout;
        let rows = &layout.rows;
        let rule = "-".repeat(usize::from(area.width));

        self.render_header(area, buf);
        self.render_stats(area, buf);

        draw_text(buf, area, 0, rows.divider, &rule, self.theme.dim());
        draw_text(buf, area, layout.padding, rows.reference_title, "Text to type:", self.theme.title());
        self.render_region(&layout.reference, rows.reference_start, rows.reference_rows, area, buf);

        draw_text(buf, area, 0, rows.separator, &rule, self.theme.dim());
        draw_text(buf, area, layout.padding, rows.input_title, "Your typing:", self.theme.title());
        self.render_region(&layout.input, rows.input_start, rows.input_rows, area, buf);
        self.render_cursor(area, buf);

        let bar_area = Rect::new(
            area.x + layout.padding,
            area.y + rows.progress_bar,
            area.width.saturating_sub(layout.padding * 2),
            1,
        );
        ProgressBar::new(layout.completion_percent, self.theme).render(bar_area, buf);
        draw_text(buf, area, layout.padding, rows.help, "ESC to quit", self.theme.dim());
    }
}
