//! Placement helpers for painting fixed rows into a buffer.
//!
//! Screens here are positioned by absolute row, so text is clipped to the
//! area rather than laid out with constraints.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::engine::width::str_width;

/// Write `text` starting at column `x` of row `y`, relative to `area`.
/// Anything outside the area is dropped.
pub fn draw_text(buf: &mut Buffer, area: Rect, x: u16, y: u16, text: &str, style: Style) {
    if x >= area.width || y >= area.height {
        return;
    }
    let max_width = usize::from(area.width - x);
    buf.set_stringn(area.x + x, area.y + y, text, max_width, style);
}

/// Column at which `text` starts when centred in a row of `width` columns.
pub fn centered_x(width: u16, text: &str) -> u16 {
    let text_width = u16::try_from(str_width(text)).unwrap_or(u16::MAX);
    (width / 2).saturating_sub(text_width / 2)
}

pub fn draw_centered(buf: &mut Buffer, area: Rect, y: u16, text: &str, style: Style) {
    draw_text(buf, area, centered_x(area.width, text), y, text, style);
}

/// Row `offset` lines from the vertical centre, if it lands inside `area`.
pub fn row_from_center(area: Rect, offset: i32) -> Option<u16> {
    let row = i32::from(area.height / 2) + offset;
    (0..i32::from(area.height))
        .contains(&row)
        .then_some(row as u16)
}

/// Text cut to at most `max` columns, for lines that must fit one row.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = crate::engine::width::char_width(ch);
        if used + w > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out
}
