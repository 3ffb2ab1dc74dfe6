//! Interfaces of the collaborators that draw the grid, own the scrollbars
//! and show the caret, plus an in-memory grid used by tests and the CLI.

/// Scrollbar axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Receives positioned runs of characters. The core does all layout; an
/// implementation only rasterizes.
pub trait RenderSurface {
    /// Places `bytes` on grid row `row` starting at column `col`.
    fn draw_text_span(&mut self, row: usize, col: usize, bytes: &[u8]);
}

/// Scrollbar widget driven by the core.
pub trait ScrollbarWidget {
    fn set_range(&mut self, axis: Axis, min: usize, max: usize);
    fn set_position(&mut self, axis: Axis, pos: usize);
}

/// Platform caret, positioned in pixels.
pub trait CaretWidget {
    fn show(&mut self);
    fn hide(&mut self);
    fn move_to(&mut self, x: usize, y: usize);
}

/// Size of one character cell in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphMetrics {
    pub width: usize,
    pub height: usize,
}

impl Default for GlyphMetrics {
    fn default() -> Self {
        Self {
            width: 8,
            height: 16,
        }
    }
}

/// A character grid that records what was drawn into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSurface {
    columns: usize,
    rows: usize,
    cells: Vec<u8>,
}

impl GridSurface {
    /// Creates a blank grid of `columns` x `rows` cells.
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![b' '; columns * rows],
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Blanks every cell.
    pub fn clear(&mut self) {
        self.cells.fill(b' ');
    }

    /// Text of one row with trailing blanks removed.
    pub fn row_text(&self, row: usize) -> String {
        let start = row * self.columns;
        let cells = &self.cells[start..start + self.columns];
        String::from_utf8_lossy(cells).trim_end().to_string()
    }

    /// Every row, trailing blanks removed.
    pub fn lines(&self) -> Vec<String> {
        (0..self.rows).map(|row| self.row_text(row)).collect()
    }
}

impl RenderSurface for GridSurface {
    fn draw_text_span(&mut self, row: usize, col: usize, bytes: &[u8]) {
        if row >= self.rows || col >= self.columns {
            return;
        }
        let len = bytes.len().min(self.columns - col);
        let start = row * self.columns + col;
        self.cells[start..start + len].copy_from_slice(&bytes[..len]);
    }
}
