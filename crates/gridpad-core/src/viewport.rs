//! The scroll engine: which part of the document is visible, and how the
//! top-left anchor moves when the user scrolls, resizes or edits.
//!
//! The anchor is never recomputed from a global position. Every scroll
//! walks the line chain from where the anchor already is, one line (Fixed)
//! or one visual row (Wrap) at a time, so the cost is bounded by the scroll
//! distance rather than the document size.

use crate::error::{EditorError, Result};
use crate::piece_table::{Document, JoinOutcome, LineChain, LineId};
use crate::surface::{Axis, GlyphMetrics, RenderSurface, ScrollbarWidget};
use crate::wrap::WrapModel;

/// Layout mode of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// One line per row; long lines scroll horizontally.
    #[default]
    Fixed,
    /// Long lines wrap onto several rows; no horizontal scrolling.
    Wrap,
}

/// Scroll direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn axis(self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Vertical,
            Direction::Left | Direction::Right => Axis::Horizontal,
        }
    }
}

/// Size of the visible grid in character cells. Both sides are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub columns: usize,
    pub rows: usize,
}

impl GridSize {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }

    /// Cells needed to cover a client area of `width` x `height` pixels.
    /// A partially visible cell counts as a whole one.
    pub fn from_pixels(width: usize, height: usize, glyph: GlyphMetrics) -> Self {
        Self::new(
            width.div_ceil(glyph.width.max(1)),
            height.div_ceil(glyph.height.max(1)),
        )
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

/// Position and upper bound of one scrollbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollAxis {
    pub pos: usize,
    pub max_pos: usize,
}

impl ScrollAxis {
    /// How far the axis can still move in the given direction.
    fn room(&self, forward: bool) -> usize {
        if forward {
            self.max_pos - self.pos
        } else {
            self.pos
        }
    }
}

/// The document position shown in the top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub line: LineId,
    /// Zero-based position of `line` in the chain.
    pub index: usize,
    /// Visual row inside `line`. Always 0 in Fixed mode.
    pub row: usize,
}

/// Fixed-mode state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedLayout {
    pub horizontal: ScrollAxis,
}

/// Wrap-mode state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapLayout {
    pub model: WrapModel,
}

/// Per-mode state. Each variant carries only what its mode needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Fixed(FixedLayout),
    Wrap(WrapLayout),
}

impl Layout {
    pub fn mode(&self) -> LayoutMode {
        match self {
            Layout::Fixed(_) => LayoutMode::Fixed,
            Layout::Wrap(_) => LayoutMode::Wrap,
        }
    }
}

/// Width available to text in Wrap mode; one column is kept for the caret
/// after a full segment.
fn wrap_columns(window: GridSize) -> usize {
    window.columns.saturating_sub(1).max(1)
}

/// Moves `anchor` back by `count` rows.
///
/// # Panics
///
/// Panics if the walk runs off the first line. Callers clamp `count`
/// against the vertical position first.
fn walk_back(layout: &Layout, chain: &LineChain, anchor: &mut Anchor, count: usize) {
    match layout {
        Layout::Fixed(_) => {
            let (line, steps) = chain.walk_back(anchor.line, count);
            assert_eq!(steps, count, "scrolled above the first line");
            anchor.line = line;
            anchor.index -= steps;
        }
        Layout::Wrap(wrap) => {
            let mut count = count;
            while count > 0 {
                if anchor.row >= count {
                    anchor.row -= count;
                    break;
                }
                count -= anchor.row + 1;
                let prev = chain
                    .prev(anchor.line)
                    .unwrap_or_else(|| panic!("scrolled above the first line"));
                anchor.line = prev;
                anchor.index -= 1;
                anchor.row = wrap.model.rows(chain.line(prev).char_count()) - 1;
            }
        }
    }
}

/// Moves `anchor` forward by `count` rows.
///
/// # Panics
///
/// Panics if the walk runs off the last line.
fn walk_forward(layout: &Layout, chain: &LineChain, anchor: &mut Anchor, count: usize) {
    match layout {
        Layout::Fixed(_) => {
            let (line, steps) = chain.walk_forward(anchor.line, count);
            assert_eq!(steps, count, "scrolled below the last line");
            anchor.line = line;
            anchor.index += steps;
        }
        Layout::Wrap(wrap) => {
            let mut count = count;
            while count > 0 {
                let remaining = wrap.model.rows(chain.line(anchor.line).char_count()) - anchor.row;
                if count < remaining {
                    anchor.row += count;
                    break;
                }
                count -= remaining;
                let next = chain
                    .next(anchor.line)
                    .unwrap_or_else(|| panic!("scrolled below the last line"));
                anchor.line = next;
                anchor.index += 1;
                anchor.row = 0;
            }
        }
    }
}

/// Draws up to `take` characters of `line`, skipping the first `skip`, on
/// grid row `row`.
fn emit_run(
    doc: &Document,
    line: LineId,
    mut skip: usize,
    mut take: usize,
    row: usize,
    surface: &mut dyn RenderSurface,
) {
    let mut col = 0;
    for span in doc.line(line).spans() {
        if take == 0 {
            break;
        }
        if skip >= span.len {
            skip -= span.len;
            continue;
        }
        let len = (span.len - skip).min(take);
        surface.draw_text_span(row, col, doc.store().slice(span.offset + skip, len));
        col += len;
        take -= len;
        skip = 0;
    }
}

/// Visible window over a document.
#[derive(Debug, Clone)]
pub struct Viewport {
    window: GridSize,
    layout: Layout,
    anchor: Anchor,
    vertical: ScrollAxis,
}

impl Viewport {
    /// Creates a viewport showing the top of `doc`.
    pub fn new(doc: &Document, window: GridSize, mode: LayoutMode) -> Self {
        let layout = match mode {
            LayoutMode::Fixed => Layout::Fixed(FixedLayout::default()),
            LayoutMode::Wrap => Layout::Wrap(WrapLayout {
                model: WrapModel::new(wrap_columns(window)),
            }),
        };
        let mut view = Self {
            window,
            layout,
            anchor: Anchor {
                line: doc.chain().first(),
                index: 0,
                row: 0,
            },
            vertical: ScrollAxis::default(),
        };
        view.cover(doc);
        view
    }

    /// Binds the viewport to `doc` and scrolls to its top.
    pub fn cover(&mut self, doc: &Document) {
        self.anchor = Anchor {
            line: doc.chain().first(),
            index: 0,
            row: 0,
        };
        self.vertical = ScrollAxis::default();
        match &mut self.layout {
            Layout::Fixed(fixed) => fixed.horizontal = ScrollAxis::default(),
            Layout::Wrap(wrap) => wrap.model.rebuild(doc.chain()),
        }
        self.update_ranges(doc);
    }

    pub fn mode(&self) -> LayoutMode {
        self.layout.mode()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Size of the whole window grid.
    pub fn window(&self) -> GridSize {
        self.window
    }

    /// Columns available to text: the window width in Fixed mode, one less
    /// in Wrap mode.
    pub fn columns(&self) -> usize {
        match &self.layout {
            Layout::Fixed(_) => self.window.columns,
            Layout::Wrap(wrap) => wrap.model.columns(),
        }
    }

    pub fn rows(&self) -> usize {
        self.window.rows
    }

    /// Wrap width, or `None` in Fixed mode.
    pub fn wrap_columns(&self) -> Option<usize> {
        match &self.layout {
            Layout::Fixed(_) => None,
            Layout::Wrap(wrap) => Some(wrap.model.columns()),
        }
    }

    pub fn wrap_model(&self) -> Option<&WrapModel> {
        match &self.layout {
            Layout::Fixed(_) => None,
            Layout::Wrap(wrap) => Some(&wrap.model),
        }
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn vertical(&self) -> ScrollAxis {
        self.vertical
    }

    /// Horizontal axis; always zero in Wrap mode.
    pub fn horizontal(&self) -> ScrollAxis {
        match &self.layout {
            Layout::Fixed(fixed) => fixed.horizontal,
            Layout::Wrap(_) => ScrollAxis::default(),
        }
    }

    /// Rows the document spans: lines in Fixed mode, visual rows in Wrap.
    pub fn vertical_extent(&self, doc: &Document) -> usize {
        match &self.layout {
            Layout::Fixed(_) => doc.line_count(),
            Layout::Wrap(wrap) => wrap.model.total_rows(),
        }
    }

    // ── Scrolling ────────────────────────────────────────────────────

    /// Scrolls by up to `count` rows or columns and returns how far the
    /// view actually moved. The count is clamped to the remaining range.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidMode`] for horizontal scrolling in
    /// Wrap mode.
    pub fn scroll(&mut self, doc: &Document, count: usize, direction: Direction) -> Result<usize> {
        match direction {
            Direction::Up => Ok(self.scroll_vertical(doc, count, false)),
            Direction::Down => Ok(self.scroll_vertical(doc, count, true)),
            Direction::Left | Direction::Right => {
                if self.mode() == LayoutMode::Wrap {
                    return Err(self.horizontal_unsupported());
                }
                Ok(self.scroll_horizontal(count, direction == Direction::Right))
            }
        }
    }

    /// Moves the given axis to `target` (clamped), as a scrollbar thumb
    /// drag does. Returns the distance moved.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidMode`] for the horizontal axis in Wrap
    /// mode.
    pub fn scroll_to(&mut self, doc: &Document, axis: Axis, target: usize) -> Result<usize> {
        let current = match axis {
            Axis::Vertical => self.vertical,
            Axis::Horizontal => match &self.layout {
                Layout::Fixed(fixed) => fixed.horizontal,
                Layout::Wrap(_) => return Err(self.horizontal_unsupported()),
            },
        };
        let target = target.min(current.max_pos);
        let forward = target > current.pos;
        let distance = target.abs_diff(current.pos);
        let moved = match axis {
            Axis::Vertical => self.scroll_vertical(doc, distance, forward),
            Axis::Horizontal => self.scroll_horizontal(distance, forward),
        };
        Ok(moved)
    }

    fn horizontal_unsupported(&self) -> EditorError {
        tracing::warn!(mode = ?self.mode(), "horizontal scroll rejected");
        EditorError::InvalidMode {
            operation: "horizontal scroll",
            mode: self.mode(),
        }
    }

    pub(crate) fn scroll_vertical(&mut self, doc: &Document, count: usize, down: bool) -> usize {
        let count = count.min(self.vertical.room(down));
        if count == 0 {
            return 0;
        }
        if down {
            walk_forward(&self.layout, doc.chain(), &mut self.anchor, count);
            self.vertical.pos += count;
        } else {
            walk_back(&self.layout, doc.chain(), &mut self.anchor, count);
            self.vertical.pos -= count;
        }
        tracing::trace!(count, down, pos = self.vertical.pos, "vertical scroll");
        count
    }

    pub(crate) fn scroll_horizontal(&mut self, count: usize, right: bool) -> usize {
        let Layout::Fixed(fixed) = &mut self.layout else {
            debug_assert!(false, "horizontal scroll requested in wrap mode");
            return 0;
        };
        let axis = &mut fixed.horizontal;
        let count = count.min(axis.room(right));
        if right {
            axis.pos += count;
        } else {
            axis.pos -= count;
        }
        if count > 0 {
            tracing::trace!(count, right, pos = axis.pos, "horizontal scroll");
        }
        count
    }

    // ── Geometry and mode ────────────────────────────────────────────

    /// Applies a new window size. Returns false if nothing changed.
    ///
    /// In Wrap mode a new width rewraps the document; the anchor keeps the
    /// segment that holds the character it showed before.
    pub fn set_window(&mut self, doc: &Document, window: GridSize) -> bool {
        let window = GridSize::new(window.columns, window.rows);
        if window == self.window {
            return false;
        }
        self.window = window;

        if let Layout::Wrap(wrap) = &mut self.layout {
            let columns = wrap_columns(window);
            let old_columns = wrap.model.columns();
            if columns != old_columns {
                let first_char = self.anchor.row * old_columns;
                wrap.model.set_columns(columns);
                wrap.model.rebuild(doc.chain());
                let rows = wrap.model.rows(doc.line(self.anchor.line).char_count());
                self.anchor.row = (first_char / columns).min(rows - 1);
                self.vertical.pos =
                    wrap.model.first_row_of(doc.chain(), self.anchor.line) + self.anchor.row;
            }
        }
        self.update_ranges(doc);
        tracing::debug!(columns = window.columns, rows = window.rows, "viewport resized");
        true
    }

    /// Like [`Viewport::set_window`], from a client area in pixels.
    pub fn resize_pixels(&mut self, doc: &Document, width: usize, height: usize, glyph: GlyphMetrics) -> bool {
        self.set_window(doc, GridSize::from_pixels(width, height, glyph))
    }

    /// Switches between Fixed and Wrap layout. The anchor stays on the same
    /// line, at its first row. Returns false if `mode` is already active.
    pub fn set_mode(&mut self, doc: &Document, mode: LayoutMode) -> bool {
        if mode == self.mode() {
            return false;
        }
        self.layout = match mode {
            LayoutMode::Fixed => Layout::Fixed(FixedLayout::default()),
            LayoutMode::Wrap => {
                let mut model = WrapModel::new(wrap_columns(self.window));
                model.rebuild(doc.chain());
                Layout::Wrap(WrapLayout { model })
            }
        };
        self.anchor.row = 0;
        self.vertical.pos = match &self.layout {
            Layout::Fixed(_) => self.anchor.index,
            Layout::Wrap(wrap) => wrap.model.first_row_of(doc.chain(), self.anchor.line),
        };
        self.update_ranges(doc);
        tracing::debug!(?mode, pos = self.vertical.pos, "layout mode switched");
        true
    }

    /// Recomputes both scroll ranges. A position past its new maximum is
    /// pulled back, walking the anchor by the overflow.
    pub(crate) fn update_ranges(&mut self, doc: &Document) {
        if let Layout::Fixed(fixed) = &mut self.layout {
            let axis = &mut fixed.horizontal;
            axis.max_pos = doc.max_line_chars().saturating_sub(self.window.columns);
            axis.pos = axis.pos.min(axis.max_pos);
        }

        let extent = self.vertical_extent(doc);
        self.vertical.max_pos = extent.saturating_sub(self.window.rows);
        if self.vertical.pos > self.vertical.max_pos {
            let overflow = self.vertical.pos - self.vertical.max_pos;
            walk_back(&self.layout, doc.chain(), &mut self.anchor, overflow);
            self.vertical.pos = self.vertical.max_pos;
        }
    }

    // ── Edit bookkeeping ─────────────────────────────────────────────

    /// Accounts for `line` (at chain position `index`) changing length from
    /// `old_len` to `new_len` without a rescan.
    pub(crate) fn line_resized(&mut self, doc: &Document, line: LineId, index: usize, old_len: usize, new_len: usize) {
        if let Layout::Wrap(wrap) = &mut self.layout {
            let delta = wrap.model.apply_len_change(old_len, new_len);
            if delta != 0 {
                if index < self.anchor.index {
                    self.vertical.pos = self.vertical.pos.saturating_add_signed(delta);
                } else if line == self.anchor.line {
                    let last_row = wrap.model.rows(new_len) - 1;
                    if self.anchor.row > last_row {
                        self.vertical.pos -= self.anchor.row - last_row;
                        self.anchor.row = last_row;
                    }
                }
            }
        }
        self.update_ranges(doc);
    }

    /// Accounts for a new line inserted right after chain position `index`.
    pub(crate) fn line_inserted(&mut self, doc: &Document, index: usize) {
        if self.anchor.index > index {
            self.anchor.index += 1;
        }
        self.reseat(doc);
    }

    /// Moves the anchor off a line removed by a join of the line at chain
    /// position `index` with its successor.
    pub(crate) fn lines_joined(&mut self, doc: &Document, outcome: JoinOutcome, index: usize) {
        match outcome {
            JoinOutcome::RemovedCurrent { removed, successor } => {
                if self.anchor.line == removed {
                    self.anchor.line = successor;
                    self.anchor.row = 0;
                } else if self.anchor.index > index {
                    self.anchor.index -= 1;
                }
            }
            JoinOutcome::RemovedNext { removed, into, offset } => {
                if self.anchor.line == removed {
                    self.anchor.line = into;
                    self.anchor.index = index;
                    self.anchor.row = match self.wrap_columns() {
                        Some(columns) => (offset + self.anchor.row * columns) / columns,
                        None => 0,
                    };
                } else if self.anchor.index > index + 1 {
                    self.anchor.index -= 1;
                }
            }
        }
        self.reseat(doc);
    }

    /// Re-derives the vertical position from the anchor after the chain
    /// changed shape. Rebuilds the wrap model.
    fn reseat(&mut self, doc: &Document) {
        match &mut self.layout {
            Layout::Fixed(_) => {
                self.anchor.row = 0;
                self.vertical.pos = self.anchor.index;
            }
            Layout::Wrap(wrap) => {
                wrap.model.rebuild(doc.chain());
                let rows = wrap.model.rows(doc.line(self.anchor.line).char_count());
                self.anchor.row = self.anchor.row.min(rows - 1);
                self.vertical.pos =
                    wrap.model.first_row_of(doc.chain(), self.anchor.line) + self.anchor.row;
            }
        }
        self.update_ranges(doc);
    }

    // ── Output ───────────────────────────────────────────────────────

    /// Emits every visible text run to `surface`.
    pub fn render(&self, doc: &Document, surface: &mut dyn RenderSurface) {
        match &self.layout {
            Layout::Fixed(fixed) => {
                let mut line = Some(self.anchor.line);
                for row in 0..self.window.rows {
                    let Some(id) = line else { break };
                    emit_run(doc, id, fixed.horizontal.pos, self.window.columns, row, surface);
                    line = doc.chain().next(id);
                }
            }
            Layout::Wrap(wrap) => {
                let columns = wrap.model.columns();
                let mut line = self.anchor.line;
                let mut segment = self.anchor.row;
                for row in 0..self.window.rows {
                    emit_run(doc, line, segment * columns, columns, row, surface);
                    segment += 1;
                    if segment >= wrap.model.rows(doc.line(line).char_count()) {
                        match doc.chain().next(line) {
                            Some(next) => {
                                line = next;
                                segment = 0;
                            }
                            None => break,
                        }
                    }
                }
            }
        }
    }

    /// Pushes both scroll ranges and positions to `widget`.
    pub fn sync_scrollbars(&self, widget: &mut dyn ScrollbarWidget) {
        widget.set_range(Axis::Vertical, 0, self.vertical.max_pos);
        widget.set_position(Axis::Vertical, self.vertical.pos);
        let horizontal = self.horizontal();
        widget.set_range(Axis::Horizontal, 0, horizontal.max_pos);
        widget.set_position(Axis::Horizontal, horizontal.pos);
    }

    /// Verifies that the anchor and the vertical position agree with the
    /// document.
    ///
    /// # Panics
    ///
    /// Panics with a description of the first violated invariant.
    pub fn assert_invariants(&self, doc: &Document) {
        let chain = doc.chain();
        assert!(chain.contains(self.anchor.line), "anchor holds a stale line");
        assert_eq!(
            chain.index_of(self.anchor.line),
            Some(self.anchor.index),
            "anchor index out of date"
        );
        assert!(self.vertical.pos <= self.vertical.max_pos, "vertical position past range");
        assert_eq!(
            self.vertical.max_pos,
            self.vertical_extent(doc).saturating_sub(self.window.rows),
            "stale vertical range"
        );
        match &self.layout {
            Layout::Fixed(fixed) => {
                assert_eq!(self.anchor.row, 0, "fixed anchor off row 0");
                assert_eq!(self.vertical.pos, self.anchor.index, "fixed anchor and position disagree");
                assert!(fixed.horizontal.pos <= fixed.horizontal.max_pos);
            }
            Layout::Wrap(wrap) => {
                let mut fresh = wrap.model;
                fresh.rebuild(chain);
                assert_eq!(wrap.model.total_rows(), fresh.total_rows(), "stale wrap model");
                let rows = wrap.model.rows(doc.line(self.anchor.line).char_count());
                assert!(self.anchor.row < rows, "anchor row past its line");
                assert_eq!(
                    self.vertical.pos,
                    wrap.model.first_row_of(chain, self.anchor.line) + self.anchor.row,
                    "wrap anchor and position disagree"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::GridSurface;

    fn doc_of_lines(count: usize) -> Document {
        let text: Vec<String> = (0..count).map(|i| format!("line {i}")).collect();
        Document::from_bytes(text.join("\n").as_bytes()).unwrap()
    }

    fn frame(view: &Viewport, doc: &Document) -> Vec<String> {
        let window = view.window();
        let mut grid = GridSurface::new(window.columns, window.rows);
        view.render(doc, &mut grid);
        grid.lines()
    }

    // ── Ranges ───────────────────────────────────────────────────────

    #[test]
    fn test_empty_document_has_no_scroll_range() {
        let doc = Document::new();
        let view = Viewport::new(&doc, GridSize::new(80, 24), LayoutMode::Fixed);
        assert_eq!(view.vertical().max_pos, 0);
        assert_eq!(view.horizontal().max_pos, 0);
        view.assert_invariants(&doc);
    }

    #[test]
    fn test_ranges_from_document_extent() {
        let long = "x".repeat(100);
        let doc = Document::from_bytes(format!("{long}\n{}", "a\n".repeat(29)).as_bytes()).unwrap();
        let view = Viewport::new(&doc, GridSize::new(80, 24), LayoutMode::Fixed);
        assert_eq!(doc.line_count(), 31);
        assert_eq!(view.vertical().max_pos, 7);
        assert_eq!(view.horizontal().max_pos, 20);
    }

    #[test]
    fn test_wrap_range_counts_visual_rows() {
        let doc = Document::from_bytes("x".repeat(245).as_bytes()).unwrap();
        let view = Viewport::new(&doc, GridSize::new(80, 2), LayoutMode::Wrap);
        assert_eq!(view.columns(), 79);
        assert_eq!(view.wrap_model().unwrap().total_rows(), 4);
        assert_eq!(view.vertical().max_pos, 2);
    }

    // ── Scrolling ────────────────────────────────────────────────────

    #[test]
    fn test_scroll_down_clamps_to_range() {
        let doc = doc_of_lines(30);
        let mut view = Viewport::new(&doc, GridSize::new(20, 10), LayoutMode::Fixed);
        assert_eq!(view.scroll(&doc, 15, Direction::Down).unwrap(), 15);
        assert_eq!(view.scroll(&doc, 15, Direction::Down).unwrap(), 5);
        assert_eq!(view.vertical().pos, 20);
        assert_eq!(view.anchor().index, 20);
        assert_eq!(view.scroll(&doc, 1, Direction::Down).unwrap(), 0);
        view.assert_invariants(&doc);
    }

    #[test]
    fn test_scroll_up_clamps_to_position() {
        let doc = doc_of_lines(30);
        let mut view = Viewport::new(&doc, GridSize::new(20, 10), LayoutMode::Fixed);
        view.scroll(&doc, 4, Direction::Down).unwrap();
        assert_eq!(view.scroll(&doc, 10, Direction::Up).unwrap(), 4);
        assert_eq!(view.anchor().line, doc.chain().first());
        view.assert_invariants(&doc);
    }

    #[test]
    fn test_scroll_zero_changes_nothing() {
        let doc = doc_of_lines(30);
        let mut view = Viewport::new(&doc, GridSize::new(20, 10), LayoutMode::Fixed);
        view.scroll(&doc, 3, Direction::Down).unwrap();
        let before = (view.anchor(), view.vertical(), view.horizontal());
        for direction in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            assert_eq!(view.scroll(&doc, 0, direction).unwrap(), 0);
        }
        assert_eq!((view.anchor(), view.vertical(), view.horizontal()), before);
    }

    #[test]
    fn test_horizontal_scroll_in_fixed_mode() {
        let doc = Document::from_bytes("y".repeat(30).as_bytes()).unwrap();
        let mut view = Viewport::new(&doc, GridSize::new(10, 5), LayoutMode::Fixed);
        assert_eq!(view.scroll(&doc, 50, Direction::Right).unwrap(), 20);
        assert_eq!(view.scroll(&doc, 5, Direction::Left).unwrap(), 5);
        assert_eq!(view.horizontal().pos, 15);
    }

    #[test]
    fn test_horizontal_scroll_rejected_in_wrap_mode() {
        let doc = Document::new();
        let mut view = Viewport::new(&doc, GridSize::new(10, 5), LayoutMode::Wrap);
        let err = view.scroll(&doc, 1, Direction::Right).unwrap_err();
        assert_eq!(
            err,
            EditorError::InvalidMode {
                operation: "horizontal scroll",
                mode: LayoutMode::Wrap
            }
        );
        assert!(view.scroll_to(&doc, Axis::Horizontal, 3).is_err());
    }

    #[test]
    fn test_wrap_walk_crosses_line_boundaries() {
        // Width 4 (window 5): rows are "aaaa" "aa" | "" | "bbbb" "bbbb" "b"
        let doc = Document::from_bytes(b"aaaaaa\n\nbbbbbbbbb").unwrap();
        let mut view = Viewport::new(&doc, GridSize::new(5, 2), LayoutMode::Wrap);
        assert_eq!(view.vertical().max_pos, 4);

        view.scroll(&doc, 1, Direction::Down).unwrap();
        assert_eq!((view.anchor().index, view.anchor().row), (0, 1));
        view.scroll(&doc, 2, Direction::Down).unwrap();
        assert_eq!((view.anchor().index, view.anchor().row), (2, 0));
        view.scroll(&doc, 1, Direction::Down).unwrap();
        assert_eq!((view.anchor().index, view.anchor().row), (2, 1));
        view.assert_invariants(&doc);

        view.scroll(&doc, 2, Direction::Up).unwrap();
        assert_eq!((view.anchor().index, view.anchor().row), (1, 0));
        view.scroll(&doc, 1, Direction::Up).unwrap();
        assert_eq!((view.anchor().index, view.anchor().row), (0, 1));
        view.assert_invariants(&doc);
    }

    #[test]
    fn test_scroll_to_moves_by_difference() {
        let doc = doc_of_lines(30);
        let mut view = Viewport::new(&doc, GridSize::new(20, 10), LayoutMode::Fixed);
        assert_eq!(view.scroll_to(&doc, Axis::Vertical, 12).unwrap(), 12);
        assert_eq!(view.scroll_to(&doc, Axis::Vertical, 100).unwrap(), 8);
        assert_eq!(view.scroll_to(&doc, Axis::Vertical, 5).unwrap(), 15);
        assert_eq!(view.anchor().index, 5);
        view.assert_invariants(&doc);
    }

    // ── Resize and mode ──────────────────────────────────────────────

    #[test]
    fn test_grow_pulls_anchor_back() {
        let doc = doc_of_lines(30);
        let mut view = Viewport::new(&doc, GridSize::new(20, 10), LayoutMode::Fixed);
        view.scroll(&doc, 20, Direction::Down).unwrap();
        assert!(view.set_window(&doc, GridSize::new(20, 25)));
        assert_eq!(view.vertical().max_pos, 5);
        assert_eq!(view.vertical().pos, 5);
        assert_eq!(view.anchor().index, 5);
        view.assert_invariants(&doc);
    }

    #[test]
    fn test_same_size_is_no_op() {
        let doc = doc_of_lines(3);
        let mut view = Viewport::new(&doc, GridSize::new(20, 10), LayoutMode::Fixed);
        assert!(!view.set_window(&doc, GridSize::new(20, 10)));
    }

    #[test]
    fn test_resize_pixels_rounds_up() {
        let doc = doc_of_lines(3);
        let mut view = Viewport::new(&doc, GridSize::new(20, 10), LayoutMode::Fixed);
        let glyph = GlyphMetrics { width: 8, height: 16 };
        view.resize_pixels(&doc, 641, 320, glyph);
        assert_eq!(view.window(), GridSize::new(81, 20));
    }

    #[test]
    fn test_wrap_resize_keeps_anchor_character() {
        let doc = Document::from_bytes("z".repeat(40).as_bytes()).unwrap();
        // Width 4: ten rows; anchor on row 5 shows characters 20..24.
        let mut view = Viewport::new(&doc, GridSize::new(5, 2), LayoutMode::Wrap);
        view.scroll(&doc, 5, Direction::Down).unwrap();
        // Width 8: character 20 is on row 2.
        view.set_window(&doc, GridSize::new(9, 2));
        assert_eq!(view.anchor().row, 2);
        assert_eq!(view.vertical().pos, 2);
        view.assert_invariants(&doc);
    }

    #[test]
    fn test_switch_mode_keeps_anchor_line() {
        let doc = Document::from_bytes(b"aaaaaaaaaa\nb\nc\nd\ne\nf").unwrap();
        let mut view = Viewport::new(&doc, GridSize::new(5, 2), LayoutMode::Fixed);
        view.scroll(&doc, 2, Direction::Down).unwrap();
        assert!(view.set_mode(&doc, LayoutMode::Wrap));
        assert_eq!(view.anchor().index, 2);
        assert_eq!(view.vertical().pos, 4);
        view.assert_invariants(&doc);

        assert!(!view.set_mode(&doc, LayoutMode::Wrap));
        assert!(view.set_mode(&doc, LayoutMode::Fixed));
        assert_eq!(view.vertical().pos, 2);
        view.assert_invariants(&doc);
    }

    // ── Rendering ────────────────────────────────────────────────────

    #[test]
    fn test_render_fixed_with_horizontal_offset() {
        let doc = Document::from_bytes(b"0123456789\nab\n\nxyz").unwrap();
        let mut view = Viewport::new(&doc, GridSize::new(4, 3), LayoutMode::Fixed);
        view.scroll(&doc, 2, Direction::Right).unwrap();
        assert_eq!(frame(&view, &doc), vec!["2345", "", ""]);
        view.scroll(&doc, 1, Direction::Down).unwrap();
        assert_eq!(frame(&view, &doc), vec!["", "", "z"]);
    }

    #[test]
    fn test_render_wrap_segments() {
        let doc = Document::from_bytes(b"abcdefghij\n\nxy").unwrap();
        let view = Viewport::new(&doc, GridSize::new(5, 6), LayoutMode::Wrap);
        assert_eq!(frame(&view, &doc), vec!["abcd", "efgh", "ij", "", "xy", ""]);
    }

    #[test]
    fn test_render_spans_after_edit() {
        let mut doc = Document::from_bytes(b"abcde").unwrap();
        let id = doc.chain().first();
        doc.insert_char(id, 3, b'X').unwrap();
        let view = Viewport::new(&doc, GridSize::new(10, 1), LayoutMode::Fixed);
        assert_eq!(frame(&view, &doc), vec!["abcXde"]);
    }
}
