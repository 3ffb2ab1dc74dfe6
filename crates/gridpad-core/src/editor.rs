//! The editor aggregate: one document, the viewport over it and an optional
//! caret. Every input event goes through here so that the three stay
//! consistent after each operation.

use crate::caret::{Caret, TextPos};
use crate::error::Result;
use crate::piece_table::{Document, JoinOutcome};
use crate::surface::{Axis, CaretWidget, GlyphMetrics, RenderSurface, ScrollbarWidget};
use crate::viewport::{Direction, GridSize, LayoutMode, Viewport};

/// Caret navigation commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

/// Settings applied when an editor is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    pub window: GridSize,
    pub mode: LayoutMode,
    /// Without a caret, navigation scrolls the view and edits are ignored.
    pub caret: bool,
    /// Rows shared between consecutive pages.
    pub page_overlap: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            window: GridSize::default(),
            mode: LayoutMode::Fixed,
            caret: true,
            page_overlap: 1,
        }
    }
}

fn ignored(operation: &'static str) -> bool {
    tracing::debug!(operation, "no caret, edit ignored");
    false
}

/// Navigation without a caret: arrows scroll one row or column, page keys
/// one page, Home/End one screen width.
fn scroll_without_caret(doc: &Document, view: &mut Viewport, motion: Motion, page: usize) -> bool {
    let fixed = view.mode() == LayoutMode::Fixed;
    let columns = view.columns();
    let moved = match motion {
        Motion::Up => view.scroll_vertical(doc, 1, false),
        Motion::Down => view.scroll_vertical(doc, 1, true),
        Motion::PageUp => view.scroll_vertical(doc, page, false),
        Motion::PageDown => view.scroll_vertical(doc, page, true),
        Motion::Left if fixed => view.scroll_horizontal(1, false),
        Motion::Right if fixed => view.scroll_horizontal(1, true),
        Motion::Home if fixed => view.scroll_horizontal(columns, false),
        Motion::End if fixed => view.scroll_horizontal(columns, true),
        Motion::Left | Motion::Right | Motion::Home | Motion::End => 0,
    };
    moved > 0
}

#[derive(Debug, Clone)]
pub struct Editor {
    doc: Document,
    view: Viewport,
    caret: Option<Caret>,
    page_overlap: usize,
}

impl Editor {
    pub fn new(doc: Document, options: EditorOptions) -> Self {
        let view = Viewport::new(&doc, options.window, options.mode);
        let caret = options.caret.then(|| Caret::new(&doc, &view));
        tracing::debug!(
            lines = doc.line_count(),
            mode = ?options.mode,
            caret = options.caret,
            "editor created"
        );
        Self {
            doc,
            view,
            caret,
            page_overlap: options.page_overlap,
        }
    }

    /// Replaces the document, returning the previous one. Viewport and caret
    /// start over at the top.
    pub fn cover(&mut self, doc: Document) -> Document {
        let previous = std::mem::replace(&mut self.doc, doc);
        self.view.cover(&self.doc);
        if self.caret.is_some() {
            self.caret = Some(Caret::new(&self.doc, &self.view));
        }
        tracing::debug!(lines = self.doc.line_count(), "document covered");
        previous
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn viewport(&self) -> &Viewport {
        &self.view
    }

    pub fn caret(&self) -> Option<&Caret> {
        self.caret.as_ref()
    }

    pub fn mode(&self) -> LayoutMode {
        self.view.mode()
    }

    /// Rows moved by page up/down.
    pub fn page_size(&self) -> usize {
        self.view.rows().saturating_sub(self.page_overlap).max(1)
    }

    // ── View ─────────────────────────────────────────────────────────

    /// Switches layout. The caret keeps its logical position; only its
    /// projection changes. Returns false if `mode` is already active.
    pub fn switch_mode(&mut self, mode: LayoutMode) -> bool {
        if !self.view.set_mode(&self.doc, mode) {
            return false;
        }
        if let Some(caret) = self.caret.as_mut() {
            caret.set_position(caret.position());
            caret.reseat(&self.doc, &self.view);
            caret.project(&self.doc, &self.view);
        }
        true
    }

    /// Applies a new window size in cells.
    pub fn resize(&mut self, window: GridSize) -> bool {
        if !self.view.set_window(&self.doc, window) {
            return false;
        }
        if let Some(caret) = self.caret.as_mut() {
            caret.reseat(&self.doc, &self.view);
            caret.project(&self.doc, &self.view);
        }
        true
    }

    /// Applies a new client area in pixels.
    pub fn resize_pixels(&mut self, width: usize, height: usize, glyph: GlyphMetrics) -> bool {
        self.resize(GridSize::from_pixels(width, height, glyph))
    }

    /// Scrollbar input. The caret does not move; it may become hidden.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidMode`](crate::EditorError::InvalidMode)
    /// for horizontal scrolling in Wrap mode.
    pub fn scroll(&mut self, count: usize, direction: Direction) -> Result<usize> {
        let moved = self.view.scroll(&self.doc, count, direction)?;
        if let Some(caret) = self.caret.as_mut() {
            caret.project(&self.doc, &self.view);
        }
        Ok(moved)
    }

    /// Scrollbar thumb drag.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidMode`](crate::EditorError::InvalidMode)
    /// for the horizontal axis in Wrap mode.
    pub fn scroll_to(&mut self, axis: Axis, target: usize) -> Result<usize> {
        let moved = self.view.scroll_to(&self.doc, axis, target)?;
        if let Some(caret) = self.caret.as_mut() {
            caret.project(&self.doc, &self.view);
        }
        Ok(moved)
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Moves the caret and scrolls it into view. Without a caret the view
    /// scrolls instead. Returns whether anything moved.
    pub fn navigate(&mut self, motion: Motion) -> bool {
        let page = self.page_size();
        let doc = &self.doc;
        let Some(caret) = self.caret.as_mut() else {
            return scroll_without_caret(doc, &mut self.view, motion, page);
        };

        let wrap = self.view.wrap_columns();
        let moved = match motion {
            Motion::Left => caret.move_left(doc, wrap),
            Motion::Right => caret.move_right(doc, wrap),
            Motion::Home => caret.move_home(),
            Motion::End => caret.move_end(doc),
            Motion::Up => caret.move_up(doc, wrap),
            Motion::Down => caret.move_down(doc, wrap),
            Motion::PageUp => {
                let mut rows = 0;
                while rows < page && caret.move_up(doc, wrap) {
                    rows += 1;
                }
                self.view.scroll_vertical(doc, rows, false);
                rows > 0
            }
            Motion::PageDown => {
                let mut rows = 0;
                while rows < page && caret.move_down(doc, wrap) {
                    rows += 1;
                }
                self.view.scroll_vertical(doc, rows, true);
                rows > 0
            }
        };
        caret.reveal(doc, &mut self.view);
        moved
    }

    // ── Editing ──────────────────────────────────────────────────────

    /// Inserts `byte` before the caret and advances it. A `\n` inserts a
    /// line break.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::OutOfMemory`](crate::EditorError::OutOfMemory)
    /// if the document cannot grow; nothing changes in that case.
    pub fn insert_char(&mut self, byte: u8) -> Result<bool> {
        if byte == b'\n' {
            return self.insert_line_break();
        }
        let Some(caret) = self.caret.as_mut() else {
            return Ok(ignored("insert character"));
        };
        let pos = caret.position();
        let old_len = self.doc.line(pos.line).char_count();

        self.doc.insert_char(pos.line, pos.offset, byte)?;
        caret.set_position(TextPos {
            offset: pos.offset + 1,
            ..pos
        });
        self.view.line_resized(&self.doc, pos.line, pos.index, old_len, old_len + 1);
        caret.reveal(&self.doc, &mut self.view);
        Ok(true)
    }

    /// Breaks the caret line at the caret; the caret moves to the start of
    /// the new line.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::OutOfMemory`](crate::EditorError::OutOfMemory)
    /// if the new line cannot be allocated.
    pub fn insert_line_break(&mut self) -> Result<bool> {
        let Some(caret) = self.caret.as_mut() else {
            return Ok(ignored("insert line break"));
        };
        let pos = caret.position();

        let new_line = self.doc.split_line(pos.line, pos.offset)?;
        self.view.line_inserted(&self.doc, pos.index);
        caret.set_position(TextPos {
            line: new_line,
            index: pos.index + 1,
            offset: 0,
        });
        caret.reseat(&self.doc, &self.view);
        caret.reveal(&self.doc, &mut self.view);
        Ok(true)
    }

    /// Deletes the character under the caret. Returns false at the end of
    /// a line, where there is no character to delete.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::OutOfMemory`](crate::EditorError::OutOfMemory)
    /// if a span had to be split and could not be.
    pub fn delete_char(&mut self) -> Result<bool> {
        let Some(caret) = self.caret.as_mut() else {
            return Ok(ignored("delete character"));
        };
        let pos = caret.position();
        let old_len = self.doc.line(pos.line).char_count();
        if pos.offset >= old_len {
            return Ok(false);
        }

        self.doc.delete_char(pos.line, pos.offset)?;
        caret.set_position(pos);
        self.view.line_resized(&self.doc, pos.line, pos.index, old_len, old_len - 1);
        caret.reveal(&self.doc, &mut self.view);
        Ok(true)
    }

    /// Joins the caret line with the next one. Returns false on the last
    /// line.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::OutOfMemory`](crate::EditorError::OutOfMemory)
    /// if the merged span list cannot grow.
    pub fn delete_line_break(&mut self) -> Result<bool> {
        let Some(caret) = self.caret.as_mut() else {
            return Ok(ignored("delete line break"));
        };
        let pos = caret.position();
        if self.doc.chain().next(pos.line).is_none() {
            return Ok(false);
        }

        let outcome = self.doc.join_next(pos.line)?;
        self.view.lines_joined(&self.doc, outcome, pos.index);
        match outcome {
            JoinOutcome::RemovedCurrent { successor, .. } => caret.set_position(TextPos {
                line: successor,
                index: pos.index,
                offset: 0,
            }),
            JoinOutcome::RemovedNext { .. } => caret.set_position(pos),
        }
        caret.reseat(&self.doc, &self.view);
        caret.reveal(&self.doc, &mut self.view);
        Ok(true)
    }

    /// The Delete key: removes the character under the caret, or the line
    /// break when the caret ends its line.
    ///
    /// # Errors
    ///
    /// Propagates [`EditorError::OutOfMemory`](crate::EditorError::OutOfMemory).
    pub fn delete_forward(&mut self) -> Result<bool> {
        let Some(caret) = self.caret.as_ref() else {
            return Ok(ignored("delete"));
        };
        let pos = caret.position();
        if pos.offset < self.doc.line(pos.line).char_count() {
            self.delete_char()
        } else {
            self.delete_line_break()
        }
    }

    /// The Backspace key: steps left, then deletes forward.
    ///
    /// # Errors
    ///
    /// Propagates [`EditorError::OutOfMemory`](crate::EditorError::OutOfMemory).
    pub fn backspace(&mut self) -> Result<bool> {
        let Some(caret) = self.caret.as_ref() else {
            return Ok(ignored("backspace"));
        };
        let pos = caret.position();
        if pos.index == 0 && pos.offset == 0 {
            return Ok(false);
        }
        self.navigate(Motion::Left);
        self.delete_forward()
    }

    /// Inserts `text` at the caret. `\n` breaks lines, `\r` is dropped.
    /// Returns the number of bytes inserted.
    ///
    /// # Errors
    ///
    /// Stops at the first [`EditorError::OutOfMemory`](crate::EditorError::OutOfMemory);
    /// everything typed before it stays.
    pub fn type_text(&mut self, text: &[u8]) -> Result<usize> {
        let mut inserted = 0;
        for &byte in text {
            if byte == b'\r' {
                continue;
            }
            if self.insert_char(byte)? {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    // ── Output ───────────────────────────────────────────────────────

    pub fn render(&self, surface: &mut dyn RenderSurface) {
        self.view.render(&self.doc, surface);
    }

    pub fn sync_scrollbars(&self, widget: &mut dyn ScrollbarWidget) {
        self.view.sync_scrollbars(widget);
    }

    /// Shows the caret widget at the caret's cell, or hides it when the
    /// caret is off screen or disabled.
    pub fn sync_caret(&self, glyph: GlyphMetrics, widget: &mut dyn CaretWidget) {
        match &self.caret {
            Some(caret) if caret.is_visible() => {
                let (row, col) = caret.screen();
                widget.move_to(col * glyph.width, row * glyph.height);
                widget.show();
            }
            _ => widget.hide(),
        }
    }

    /// Checks document, viewport and caret against each other.
    ///
    /// # Panics
    ///
    /// Panics with a description of the first violated invariant.
    pub fn assert_invariants(&self) {
        self.doc.assert_invariants();
        self.view.assert_invariants(&self.doc);
        if let Some(caret) = &self.caret {
            caret.assert_invariants(&self.doc, &self.view);
        }
    }
}
