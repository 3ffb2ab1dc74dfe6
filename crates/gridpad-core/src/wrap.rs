//! Soft-wrap row model.
//!
//! Tracks how many visual rows the whole document occupies when every line
//! is cut into segments of `columns` characters, so the vertical scroll
//! range and the caret's visual row can be derived without re-wrapping.

use crate::piece_table::{LineChain, LineId};

/// Number of visual rows a line of `len` characters occupies.
///
/// An empty line still takes one row.
pub fn rows_for(len: usize, columns: usize) -> usize {
    debug_assert!(columns > 0, "wrap width must be positive");
    if len == 0 {
        1
    } else {
        len.div_ceil(columns)
    }
}

/// Visual row and column of intra-line `offset` on a line of `len` chars.
///
/// The end of a line whose length is a multiple of `columns` stays on the
/// last row, in the column just past the text (the column reserved for the
/// wrap marker), instead of opening a row that does not exist.
pub fn segment_of(offset: usize, len: usize, columns: usize) -> (usize, usize) {
    if offset > 0 && offset == len && offset % columns == 0 {
        (offset / columns - 1, columns)
    } else {
        (offset / columns, offset % columns)
    }
}

/// Offset reached by placing the caret at visual column `col` of row `row`
/// on a line of `len` characters.
pub fn offset_in_row(len: usize, columns: usize, row: usize, col: usize) -> usize {
    let start = row * columns;
    if row + 1 < rows_for(len, columns) {
        start + col.min(columns - 1)
    } else {
        (start + col).min(len)
    }
}

/// Cached total of visual rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapModel {
    valid: bool,
    total_rows: usize,
    columns: usize,
}

impl WrapModel {
    /// Creates an invalid model for the given wrap width.
    pub fn new(columns: usize) -> Self {
        Self {
            valid: false,
            total_rows: 0,
            columns: columns.max(1),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Total visual rows of the document.
    ///
    /// # Panics
    ///
    /// Panics (in debug builds) if the model has been invalidated and not
    /// rebuilt yet.
    pub fn total_rows(&self) -> usize {
        debug_assert!(self.valid, "wrap model read while invalid");
        self.total_rows
    }

    /// Rows occupied by a line of `len` characters at the current width.
    pub fn rows(&self, len: usize) -> usize {
        rows_for(len, self.columns)
    }

    /// Changes the wrap width. The model stays invalid until rebuilt.
    pub fn set_columns(&mut self, columns: usize) {
        let columns = columns.max(1);
        if columns != self.columns {
            self.columns = columns;
            self.valid = false;
        }
    }

    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Recounts all rows with a linear scan over the chain.
    pub fn rebuild(&mut self, chain: &LineChain) {
        self.total_rows = chain
            .iter()
            .map(|(_, line)| self.rows(line.char_count()))
            .sum();
        self.valid = true;
        tracing::trace!(total_rows = self.total_rows, columns = self.columns, "wrap model rebuilt");
    }

    /// Visual row at which `line` starts.
    pub fn first_row_of(&self, chain: &LineChain, line: LineId) -> usize {
        let mut row = 0;
        for (id, candidate) in chain.iter() {
            if id == line {
                return row;
            }
            row += self.rows(candidate.char_count());
        }
        panic!("line {line:?} is not part of the chain");
    }

    /// Applies a single-line length change without rescanning.
    ///
    /// Returns the signed change in total rows, which is -1, 0 or +1 for a
    /// one-character edit.
    pub fn apply_len_change(&mut self, old_len: usize, new_len: usize) -> isize {
        let before = self.rows(old_len);
        let after = self.rows(new_len);
        if after >= before {
            self.total_rows += after - before;
            (after - before) as isize
        } else {
            self.total_rows -= before - after;
            -((before - after) as isize)
        }
    }
}
