//! Word-boundary line wrapping measured in display columns.
//!
//! Text is split on `\n` into paragraphs and each paragraph is packed
//! greedily, one whitespace-delimited word at a time. Runs of whitespace
//! collapse into a single joining space. A word wider than the budget is
//! split glyph by glyph; its last piece stays open so the following words can
//! still pack behind it.
//!
//! Every wrapped line remembers which code point of the source text each of
//! its glyphs came from. The layout engine uses that to colour typed input
//! and the reference text without re-deriving the wrap.

use crate::engine::width::char_width;

/// One display line produced by the wrapper.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WrappedLine {
    text: String,
    /// Code-point index in the source text for every char of `text`.
    sources: Vec<usize>,
    width: usize,
}

impl WrappedLine {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Display width in columns.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Glyphs of the line paired with their source code-point index.
    pub fn glyphs(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        self.text.chars().zip(self.sources.iter().copied())
    }

    fn push(&mut self, ch: char, source: usize) {
        self.text.push(ch);
        self.sources.push(source);
        self.width += char_width(ch);
    }
}

struct Word {
    glyphs: Vec<(char, usize)>,
    width: usize,
    /// Index of the whitespace run that precedes the word, if any.
    gap: Option<usize>,
}

/// Wrap `text` into lines no wider than `max_width` columns.
///
/// An empty input yields no lines; a lone `"\n"` yields two empty lines.
/// A budget of zero is treated as one.
pub fn wrap(text: &str, max_width: usize) -> Vec<String> {
    wrap_lines(text, max_width)
        .into_iter()
        .map(|line| line.text)
        .collect()
}

/// Same as [`wrap`] but keeps the source index of every glyph.
pub fn wrap_lines(text: &str, max_width: usize) -> Vec<WrappedLine> {
    if text.is_empty() {
        return Vec::new();
    }
    let max_width = max_width.max(1);

    let mut lines = Vec::new();
    let mut offset = 0;
    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph, offset, max_width, &mut lines);
        // +1 for the newline consumed by split
        offset += paragraph.chars().count() + 1;
    }
    lines
}

fn wrap_paragraph(paragraph: &str, offset: usize, max_width: usize, lines: &mut Vec<WrappedLine>) {
    let words = split_words(paragraph, offset);
    if words.is_empty() {
        lines.push(WrappedLine::default());
        return;
    }

    let mut line = WrappedLine::default();

    for word in words {
        if word.width > max_width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            for &(ch, source) in &word.glyphs {
                if !line.is_empty() && line.width + char_width(ch) > max_width {
                    lines.push(std::mem::take(&mut line));
                }
                line.push(ch, source);
            }
            continue;
        }

        let space = usize::from(!line.is_empty());
        if line.width + space + word.width <= max_width {
            if space == 1 {
                let gap = word
                    .gap
                    .unwrap_or_else(|| word.glyphs[0].1.saturating_sub(1));
                line.push(' ', gap);
            }
        } else {
            lines.push(std::mem::take(&mut line));
        }
        for (ch, source) in word.glyphs {
            line.push(ch, source);
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
}

fn split_words(paragraph: &str, offset: usize) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current: Option<Word> = None;
    let mut gap = None;

    for (i, ch) in paragraph.chars().enumerate() {
        let source = offset + i;
        if ch.is_whitespace() {
            if let Some(word) = current.take() {
                words.push(word);
            }
            gap.get_or_insert(source);
            continue;
        }
        let word = current.get_or_insert_with(|| Word {
            glyphs: Vec::new(),
            width: 0,
            gap: gap.take(),
        });
        word.glyphs.push((ch, source));
        word.width += char_width(ch);
    }
    if let Some(word) = current {
        words.push(word);
    }
    words
}
