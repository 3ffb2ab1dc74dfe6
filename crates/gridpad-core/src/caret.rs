//! Caret position and its projection onto the visible grid.
//!
//! The caret is stored logically (line, chain index, intra-line offset).
//! Its screen cell is derived from that and from the viewport; it is never
//! the source of truth.
//!
//! Visibility convention: a row is visible when it lies in
//! `[top, top + rows)`. In Fixed mode a column is visible when it lies in
//! `[left, left + columns]`; the slot right after the last visible column
//! is drawn on that column, so a caret that ends the longest line stays
//! on screen. In Wrap mode the window keeps an extra column for that slot.
//! A caret outside these bounds is flagged hidden on that axis and its
//! screen coordinate is clamped to the nearest border.

use crate::piece_table::{Document, LineId};
use crate::viewport::Viewport;
use crate::wrap::{offset_in_row, rows_for, segment_of};

/// Logical caret position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPos {
    pub line: LineId,
    /// Zero-based position of `line` in the chain.
    pub index: usize,
    /// Characters before the caret on its line.
    pub offset: usize,
}

/// Per-axis flags set while the caret is outside the visible grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HiddenFlags {
    pub x: bool,
    pub y: bool,
}

impl HiddenFlags {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caret {
    pos: TextPos,
    /// First visual row of `pos.line`; only meaningful in Wrap mode.
    line_row: usize,
    screen_row: usize,
    screen_col: usize,
    hidden: HiddenFlags,
    /// Column that up/down try to return to.
    desired_col: Option<usize>,
}

impl Caret {
    /// A caret at the start of the document.
    pub(crate) fn new(doc: &Document, view: &Viewport) -> Self {
        let mut caret = Self {
            pos: TextPos {
                line: doc.chain().first(),
                index: 0,
                offset: 0,
            },
            line_row: 0,
            screen_row: 0,
            screen_col: 0,
            hidden: HiddenFlags::default(),
            desired_col: None,
        };
        caret.project(doc, view);
        caret
    }

    pub fn position(&self) -> TextPos {
        self.pos
    }

    /// Screen cell as `(row, col)`.
    pub fn screen(&self) -> (usize, usize) {
        (self.screen_row, self.screen_col)
    }

    pub fn hidden(&self) -> HiddenFlags {
        self.hidden
    }

    pub fn is_visible(&self) -> bool {
        !self.hidden.any()
    }

    pub fn desired_col(&self) -> Option<usize> {
        self.desired_col
    }

    pub(crate) fn set_position(&mut self, pos: TextPos) {
        self.pos = pos;
        self.desired_col = None;
    }

    /// Absolute `(row, col)` in document space: lines and offsets in Fixed
    /// mode, visual rows and segment columns in Wrap mode.
    pub fn absolute(&self, doc: &Document, view: &Viewport) -> (usize, usize) {
        match view.wrap_columns() {
            None => (self.pos.index, self.pos.offset),
            Some(columns) => {
                let len = doc.line(self.pos.line).char_count();
                let (row, col) = segment_of(self.pos.offset, len, columns);
                (self.line_row + row, col)
            }
        }
    }

    /// Recomputes the first visual row of the caret line from scratch.
    /// Needed after the chain changed shape or the wrap width changed.
    pub(crate) fn reseat(&mut self, doc: &Document, view: &Viewport) {
        self.line_row = view
            .wrap_model()
            .map_or(0, |model| model.first_row_of(doc.chain(), self.pos.line));
    }

    /// Derives the screen cell and hidden flags from the current viewport
    /// without moving it.
    pub(crate) fn project(&mut self, doc: &Document, view: &Viewport) {
        let (row, col) = self.absolute(doc, view);

        let top = view.vertical().pos;
        let rows = view.rows();
        (self.screen_row, self.hidden.y) = if row < top {
            (0, true)
        } else if row - top >= rows {
            (rows - 1, true)
        } else {
            (row - top, false)
        };

        if view.wrap_columns().is_some() {
            self.screen_col = col.min(view.window().columns - 1);
            self.hidden.x = false;
        } else {
            let left = view.horizontal().pos;
            let columns = view.columns();
            (self.screen_col, self.hidden.x) = if col < left {
                (0, true)
            } else if col - left > columns {
                (columns - 1, true)
            } else {
                ((col - left).min(columns - 1), false)
            };
        }
    }

    /// Scrolls `view` by the smallest amount that brings the caret inside
    /// the grid, then projects it.
    pub(crate) fn reveal(&mut self, doc: &Document, view: &mut Viewport) {
        let (row, col) = self.absolute(doc, view);

        let top = view.vertical().pos;
        let rows = view.rows();
        if row < top {
            view.scroll_vertical(doc, top - row, false);
        } else if row >= top + rows {
            view.scroll_vertical(doc, row + 1 - (top + rows), true);
        }

        if view.wrap_columns().is_none() {
            let left = view.horizontal().pos;
            let columns = view.columns();
            if col < left {
                view.scroll_horizontal(left - col, false);
            } else if col >= left + columns {
                view.scroll_horizontal(col + 1 - (left + columns), true);
            }
        }

        self.project(doc, view);
    }

    // ── Motion ───────────────────────────────────────────────────────
    //
    // `wrap` is the wrap width, `None` in Fixed mode. Every motion returns
    // whether the logical position changed.

    fn enter_prev_line(&mut self, doc: &Document, wrap: Option<usize>) -> bool {
        let Some(prev) = doc.chain().prev(self.pos.line) else {
            return false;
        };
        if let Some(columns) = wrap {
            self.line_row -= rows_for(doc.line(prev).char_count(), columns);
        }
        self.pos.line = prev;
        self.pos.index -= 1;
        true
    }

    fn enter_next_line(&mut self, doc: &Document, wrap: Option<usize>) -> bool {
        let Some(next) = doc.chain().next(self.pos.line) else {
            return false;
        };
        if let Some(columns) = wrap {
            self.line_row += rows_for(doc.line(self.pos.line).char_count(), columns);
        }
        self.pos.line = next;
        self.pos.index += 1;
        true
    }

    pub(crate) fn move_left(&mut self, doc: &Document, wrap: Option<usize>) -> bool {
        self.desired_col = None;
        if self.pos.offset > 0 {
            self.pos.offset -= 1;
            return true;
        }
        if self.enter_prev_line(doc, wrap) {
            self.pos.offset = doc.line(self.pos.line).char_count();
            return true;
        }
        false
    }

    pub(crate) fn move_right(&mut self, doc: &Document, wrap: Option<usize>) -> bool {
        self.desired_col = None;
        if self.pos.offset < doc.line(self.pos.line).char_count() {
            self.pos.offset += 1;
            return true;
        }
        if self.enter_next_line(doc, wrap) {
            self.pos.offset = 0;
            return true;
        }
        false
    }

    pub(crate) fn move_home(&mut self) -> bool {
        self.desired_col = None;
        let moved = self.pos.offset != 0;
        self.pos.offset = 0;
        moved
    }

    pub(crate) fn move_end(&mut self, doc: &Document) -> bool {
        self.desired_col = None;
        let end = doc.line(self.pos.line).char_count();
        let moved = self.pos.offset != end;
        self.pos.offset = end;
        moved
    }

    /// One line up in Fixed mode, one visual row up in Wrap mode.
    pub(crate) fn move_up(&mut self, doc: &Document, wrap: Option<usize>) -> bool {
        let len = doc.line(self.pos.line).char_count();
        match wrap {
            None => {
                let col = *self.desired_col.get_or_insert(self.pos.offset);
                if !self.enter_prev_line(doc, wrap) {
                    return false;
                }
                self.pos.offset = col.min(doc.line(self.pos.line).char_count());
            }
            Some(columns) => {
                let (row, col) = segment_of(self.pos.offset, len, columns);
                let col = *self.desired_col.get_or_insert(col);
                if row > 0 {
                    self.pos.offset = offset_in_row(len, columns, row - 1, col);
                    return true;
                }
                if !self.enter_prev_line(doc, wrap) {
                    return false;
                }
                let len = doc.line(self.pos.line).char_count();
                let last = rows_for(len, columns) - 1;
                self.pos.offset = offset_in_row(len, columns, last, col);
            }
        }
        true
    }

    /// One line down in Fixed mode, one visual row down in Wrap mode.
    pub(crate) fn move_down(&mut self, doc: &Document, wrap: Option<usize>) -> bool {
        let len = doc.line(self.pos.line).char_count();
        match wrap {
            None => {
                let col = *self.desired_col.get_or_insert(self.pos.offset);
                if !self.enter_next_line(doc, wrap) {
                    return false;
                }
                self.pos.offset = col.min(doc.line(self.pos.line).char_count());
            }
            Some(columns) => {
                let (row, col) = segment_of(self.pos.offset, len, columns);
                let col = *self.desired_col.get_or_insert(col);
                if row + 1 < rows_for(len, columns) {
                    self.pos.offset = offset_in_row(len, columns, row + 1, col);
                    return true;
                }
                if !self.enter_next_line(doc, wrap) {
                    return false;
                }
                let len = doc.line(self.pos.line).char_count();
                self.pos.offset = offset_in_row(len, columns, 0, col);
            }
        }
        true
    }

    /// Verifies the caret against the document and viewport.
    ///
    /// # Panics
    ///
    /// Panics with a description of the first violated invariant.
    pub fn assert_invariants(&self, doc: &Document, view: &Viewport) {
        let chain = doc.chain();
        assert!(chain.contains(self.pos.line), "caret holds a stale line");
        assert_eq!(chain.index_of(self.pos.line), Some(self.pos.index), "caret index out of date");
        let len = doc.line(self.pos.line).char_count();
        assert!(self.pos.offset <= len, "caret offset {} past line end {len}", self.pos.offset);
        if let Some(model) = view.wrap_model() {
            assert_eq!(
                self.line_row,
                model.first_row_of(chain, self.pos.line),
                "caret line row out of date"
            );
        }
        assert!(self.screen_row < view.rows(), "caret row off the grid");
        assert!(self.screen_col < view.window().columns, "caret column off the grid");
    }
}
