//! Display-column measurement for single glyphs and strings.
//!
//! Widths follow East Asian Width classification: wide and fullwidth glyphs
//! take two columns, combining and zero-width marks take none. Control
//! characters have no defined width and are counted as one column so that a
//! stray byte never collapses the cursor onto its neighbour.

use unicode_width::UnicodeWidthChar;

/// Column width of a single glyph: 0, 1 or 2.
pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(1)
}

/// Total column width of a string.
pub fn str_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}
