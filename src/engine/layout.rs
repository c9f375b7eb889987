//! Adaptive placement of the session screen.
//!
//! [`compute_layout`] turns a viewport and a session into plain data: which
//! screen rows hold which part of the session screen, the wrapped reference
//! and input text, the slice of each that is visible, per-glyph correctness
//! and the cursor cell. Nothing is cached between calls; a resize simply
//! produces a different result on the next frame.

use serde::{Deserialize, Serialize};

use crate::engine::wrap::{WrappedLine, wrap_lines};
use crate::session::metrics;
use crate::session::state::{CharClass, SessionState};

/// Horizontal padding never exceeds this, whatever the config says.
pub const MAX_PADDING: u16 = 4;

/// Tunable size thresholds. All fields have defaults so a partial
/// `[layout]` table in the config file still loads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub min_width: u16,
    pub min_height: u16,
    pub max_padding: u16,
    pub min_content_width: u16,
    pub min_content_rows: u16,
    pub min_region_rows: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_width: 40,
            min_height: 15,
            max_padding: MAX_PADDING,
            min_content_width: 20,
            min_content_rows: 4,
            min_region_rows: 2,
        }
    }
}

impl LayoutConfig {
    /// Pull hand-edited values back into a range where the content area
    /// always fits a viewport that passes the size check.
    pub fn normalize(&mut self) {
        let defaults = Self::default();
        self.max_padding = self.max_padding.min(MAX_PADDING);
        if self.min_content_width == 0 {
            self.min_content_width = defaults.min_content_width;
        }
        let widest = self.min_width.saturating_sub(self.max_padding * 2).max(1);
        self.min_content_width = self.min_content_width.min(widest);
        self.min_region_rows = self.min_region_rows.max(1);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Full,    // ≥24 rows: spacious header, stats with progress line
    Medium,  // 18-23 rows: header and source, one-line stats
    Compact, // <18 rows: title only, compact stats
}

impl LayoutTier {
    pub fn from_height(height: u16) -> Self {
        if height >= 24 {
            LayoutTier::Full
        } else if height >= 18 {
            LayoutTier::Medium
        } else {
            LayoutTier::Compact
        }
    }

    pub fn top_margin(self) -> u16 {
        match self {
            LayoutTier::Full => 4,
            LayoutTier::Medium => 2,
            LayoutTier::Compact => 1,
        }
    }

    pub fn stats_rows(self) -> u16 {
        match self {
            LayoutTier::Full => 3,
            LayoutTier::Medium => 2,
            LayoutTier::Compact => 1,
        }
    }

    pub fn reference_header_rows(self) -> u16 {
        match self {
            LayoutTier::Full => 2,
            LayoutTier::Medium | LayoutTier::Compact => 1,
        }
    }

    pub fn input_header_rows(self) -> u16 {
        match self {
            LayoutTier::Full => 2,
            LayoutTier::Medium | LayoutTier::Compact => 1,
        }
    }

    pub fn bottom_margin(self) -> u16 {
        match self {
            LayoutTier::Full => 3,
            LayoutTier::Medium | LayoutTier::Compact => 2,
        }
    }

    /// Full title plus the `Source:` line, rather than the short title.
    pub fn shows_source(self) -> bool {
        self != LayoutTier::Compact
    }

    /// Long-form stats line (`Time | WPM | Errors`) instead of `WPM | Err`.
    pub fn detailed_stats(self) -> bool {
        self != LayoutTier::Compact
    }
}

/// Screen rows of every element of the session screen, top to bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenRows {
    pub title: u16,
    pub source: Option<u16>,
    pub stats: u16,
    /// Separate `Progress: N%` line, only when the stats block has room.
    pub stats_progress: Option<u16>,
    pub divider: u16,
    pub reference_title: u16,
    pub reference_start: u16,
    pub reference_rows: u16,
    pub separator: u16,
    pub input_title: u16,
    pub input_start: u16,
    pub input_rows: u16,
    pub progress_bar: u16,
    pub help: u16,
}

/// Half-open range of line indices shown in a region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

impl Window {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Window centred on typing progress, pinned to the end near the bottom.
pub fn reference_window(line_count: usize, rows: usize, progress: f64) -> Window {
    if line_count <= rows {
        return Window {
            start: 0,
            end: line_count,
        };
    }
    let mid = (progress.clamp(0.0, 1.0) * line_count as f64) as usize;
    let mut start = mid.saturating_sub(rows / 2);
    let mut end = (start + rows).min(line_count);
    if end >= line_count {
        start = line_count.saturating_sub(rows);
        end = line_count;
    }
    Window { start, end }
}

/// Window that keeps `cursor_line` on the last visible row once it scrolls.
pub fn tail_window(line_count: usize, rows: usize, cursor_line: usize) -> Window {
    let start = if rows > 0 && cursor_line >= rows {
        cursor_line - (rows - 1)
    } else {
        0
    };
    Window {
        start,
        end: (start + rows).min(line_count),
    }
}

/// Wrapped text of one region plus what is visible of it.
#[derive(Clone, Debug, PartialEq)]
pub struct WrappedRegion {
    pub lines: Vec<WrappedLine>,
    pub window: Window,
    /// Correctness of every glyph on the visible lines, row by row.
    pub classes: Vec<Vec<CharClass>>,
}

impl WrappedRegion {
    fn new(lines: Vec<WrappedLine>, window: Window, classify: impl Fn(usize) -> CharClass) -> Self {
        let classes = lines[window.start..window.end]
            .iter()
            .map(|line| line.glyphs().map(|(_, source)| classify(source)).collect())
            .collect();
        Self {
            lines,
            window,
            classes,
        }
    }

    pub fn visible(&self) -> &[WrappedLine] {
        &self.lines[self.window.start..self.window.end]
    }

    /// Visible lines with their row offset inside the region and glyph classes.
    pub fn rows(&self) -> impl Iterator<Item = (u16, &WrappedLine, &[CharClass])> + '_ {
        self.visible()
            .iter()
            .zip(self.classes.iter())
            .enumerate()
            .map(|(i, (line, classes))| (i as u16, line, classes.as_slice()))
    }

    pub fn more_above(&self) -> bool {
        self.window.start > 0
    }

    pub fn more_below(&self) -> bool {
        self.window.end < self.lines.len()
    }
}

/// Cursor location in wrapped-input coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorPosition {
    pub line: usize,
    pub column: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionLayout {
    pub viewport: Viewport,
    pub tier: LayoutTier,
    pub padding: u16,
    pub content_width: u16,
    pub rows: ScreenRows,
    pub reference: WrappedRegion,
    pub input: WrappedRegion,
    pub cursor: CursorPosition,
    pub completion_percent: u16,
}

impl SessionLayout {
    /// Absolute cell of the cursor, if it falls inside the input window and
    /// above the help line.
    pub fn cursor_cell(&self) -> Option<(u16, u16)> {
        let window = self.input.window;
        if self.cursor.line < window.start {
            return None;
        }
        let row = self.cursor.line - window.start;
        if row >= usize::from(self.rows.input_rows) {
            return None;
        }
        let x = usize::from(self.padding) + self.cursor.column;
        let y = usize::from(self.rows.input_start) + row;
        if x >= usize::from(self.viewport.width) || y + 1 >= usize::from(self.viewport.height) {
            return None;
        }
        Some((x as u16, y as u16))
    }

    /// Column where scroll indicators are drawn, if the screen is wide enough.
    pub fn indicator_column(&self) -> Option<u16> {
        (self.viewport.width > 20).then(|| self.viewport.width - 6)
    }
}

/// Viewport too small for the session screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DegradedLayout {
    pub viewport: Viewport,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LayoutResult {
    Full(SessionLayout),
    Degraded(DegradedLayout),
}

impl LayoutResult {
    pub fn is_degraded(&self) -> bool {
        matches!(self, LayoutResult::Degraded(_))
    }
}

pub fn padding_for(width: u16, config: &LayoutConfig) -> u16 {
    config.max_padding.min(MAX_PADDING).min(width / 10)
}

pub fn content_width_for(width: u16, config: &LayoutConfig) -> u16 {
    let padding = padding_for(width, config);
    config
        .min_content_width
        .max(width.saturating_sub(padding * 2))
}

fn screen_rows(height: u16, tier: LayoutTier, config: &LayoutConfig) -> Option<ScreenRows> {
    let top = tier.top_margin();
    let stats_rows = tier.stats_rows();
    let content_start = top + stats_rows + 1;
    let content_end = height.checked_sub(tier.bottom_margin())?;
    let content_rows = content_end.checked_sub(content_start)?;
    if content_rows < config.min_content_rows {
        return None;
    }

    let floor = config.min_region_rows;
    let ref_header = tier.reference_header_rows();
    let input_header = tier.input_header_rows();
    let reference_rows = floor.max(content_rows / 3);
    let input_rows = floor.max(
        content_rows
            .saturating_sub(reference_rows + ref_header + input_header + 1),
    );

    let reference_title = content_start;
    let reference_start = reference_title + ref_header;
    let separator = reference_start + reference_rows;
    let input_title = separator + 1;
    let input_start = input_title + input_header;
    let progress_bar = height - 2;

    // The floors above can push the input region into the footer on short
    // custom thresholds; never let it overlap the progress bar.
    let input_rows = input_rows.min(progress_bar.saturating_sub(input_start));
    if input_rows < floor {
        return None;
    }

    Some(ScreenRows {
        title: if tier.shows_source() { 1 } else { 0 },
        source: tier.shows_source().then_some(3),
        stats: top,
        stats_progress: (stats_rows >= 3).then_some(top + 1),
        divider: content_start - 1,
        reference_title,
        reference_start,
        reference_rows,
        separator,
        input_title,
        input_start,
        input_rows,
        progress_bar,
        help: height - 1,
    })
}

/// Lay out the session screen for one frame.
pub fn compute_layout(state: &SessionState, viewport: Viewport, config: &LayoutConfig) -> LayoutResult {
    let degraded = LayoutResult::Degraded(DegradedLayout { viewport });
    if viewport.width < config.min_width || viewport.height < config.min_height {
        return degraded;
    }

    let tier = LayoutTier::from_height(viewport.height);
    let Some(rows) = screen_rows(viewport.height, tier, config) else {
        return degraded;
    };

    let padding = padding_for(viewport.width, config);
    let content_width = content_width_for(viewport.width, config);
    let budget = usize::from(content_width);

    let reference_lines = wrap_lines(state.reference_text(), budget);
    let reference_window = reference_window(
        reference_lines.len(),
        usize::from(rows.reference_rows),
        state.progress(),
    );
    let reference = WrappedRegion::new(reference_lines, reference_window, |idx| {
        state.classify_reference(idx)
    });

    let input_lines = wrap_lines(&state.input_text(), budget);
    let cursor = input_lines
        .last()
        .map(|line| CursorPosition {
            line: input_lines.len() - 1,
            column: line.width(),
        })
        .unwrap_or_default();
    let input_window = tail_window(input_lines.len(), usize::from(rows.input_rows), cursor.line);
    let input = WrappedRegion::new(input_lines, input_window, |idx| state.classify_input(idx));

    LayoutResult::Full(SessionLayout {
        viewport,
        tier,
        padding,
        content_width,
        rows,
        reference,
        input,
        cursor,
        completion_percent: metrics::completion_percent(state.input_len(), state.reference_len()),
    })
}
