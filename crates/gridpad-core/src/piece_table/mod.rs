//! Piece-table document: an append-only [`TextStore`] plus the
//! [`LineChain`] of span lists that reference it.
//!
//! Editing never rewrites stored bytes. Inserting appends one byte to the
//! store and splices a span; deleting only shrinks or drops spans. Line
//! breaks are not stored at all, they are the boundaries between lines.

mod line;
mod span;

pub use line::{Line, LineChain, LineId, Lines};
pub use span::Span;

use crate::error::Result;
use crate::text_store::TextStore;

/// What [`Document::join_next`] removed, so that references to the removed
/// line can be moved onto the line that took over its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The current line was empty and was dropped. Its successor now sits
    /// at the same position in the chain.
    RemovedCurrent { removed: LineId, successor: LineId },
    /// The next line was dropped. Its characters, if any, now follow the
    /// first `offset` characters of `into`.
    RemovedNext {
        removed: LineId,
        into: LineId,
        offset: usize,
    },
}

impl JoinOutcome {
    pub fn removed(&self) -> LineId {
        match *self {
            JoinOutcome::RemovedCurrent { removed, .. } | JoinOutcome::RemovedNext { removed, .. } => {
                removed
            }
        }
    }
}

/// A document: owns its text store and line chain.
#[derive(Debug, Clone)]
pub struct Document {
    store: TextStore,
    chain: LineChain,
    /// Length of the longest line, kept for the horizontal scroll range.
    max_line_chars: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document: one empty line.
    pub fn new() -> Self {
        Self::with_store(TextStore::new())
    }

    /// Creates an empty document whose store may not grow past `limit` bytes.
    pub fn with_store_limit(limit: usize) -> Self {
        Self::with_store(TextStore::with_limit(limit))
    }

    fn with_store(store: TextStore) -> Self {
        let chain = LineChain::new(Line::from_spans(vec![Span::empty(0)]));
        Self {
            store,
            chain,
            max_line_chars: 0,
        }
    }

    /// Builds a document from raw bytes, one line per `\n`-terminated record.
    /// A `\r` right before a `\n` is not part of the line.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::OutOfMemory`](crate::EditorError::OutOfMemory)
    /// if the bytes do not fit in the store.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::load(TextStore::new(), bytes)
    }

    /// Like [`Document::from_bytes`] with a store limit.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::OutOfMemory`](crate::EditorError::OutOfMemory)
    /// if the bytes exceed `limit`.
    pub fn from_bytes_with_limit(bytes: &[u8], limit: usize) -> Result<Self> {
        Self::load(TextStore::with_limit(limit), bytes)
    }

    fn load(mut store: TextStore, bytes: &[u8]) -> Result<Self> {
        let base = store.extend(bytes)?;

        let mut records = bytes.split(|b| *b == b'\n').scan(base, |start, record| {
            let offset = *start;
            *start += record.len() + 1;
            let len = match record.last() {
                Some(b'\r') => record.len() - 1,
                _ => record.len(),
            };
            Some(if len == 0 {
                Span::empty(offset)
            } else {
                Span::new(offset, len)
            })
        });

        // `split` always yields at least one record.
        let first = records.next().unwrap_or_else(|| Span::empty(base));
        let mut chain = LineChain::new(Line::from_spans(vec![first]));
        let mut last = chain.first();
        for span in records {
            last = chain.insert_after(last, Line::from_spans(vec![span]));
        }

        let mut doc = Self {
            store,
            chain,
            max_line_chars: 0,
        };
        doc.recompute_max_line_chars();
        tracing::debug!(
            lines = doc.line_count(),
            bytes = bytes.len(),
            max_line_chars = doc.max_line_chars,
            "document loaded"
        );
        Ok(doc)
    }

    pub fn store(&self) -> &TextStore {
        &self.store
    }

    pub fn chain(&self) -> &LineChain {
        &self.chain
    }

    pub fn line(&self, id: LineId) -> &Line {
        self.chain.line(id)
    }

    pub fn line_count(&self) -> usize {
        self.chain.len()
    }

    /// Length of the longest line.
    pub fn max_line_chars(&self) -> usize {
        self.max_line_chars
    }

    /// Characters of one line, concatenated from its spans.
    pub fn line_bytes(&self, id: LineId) -> Vec<u8> {
        let line = self.chain.line(id);
        let mut out = Vec::with_capacity(line.char_count);
        for span in &line.spans {
            out.extend_from_slice(self.store.slice(span.offset, span.len));
        }
        out
    }

    /// Convenience for tests and diagnostics.
    pub fn line_text(&self, id: LineId) -> String {
        String::from_utf8_lossy(&self.line_bytes(id)).into_owned()
    }

    /// The whole document with `\n` between lines.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (i, (id, _)) in self.chain.iter().enumerate() {
            if i > 0 {
                out.push(b'\n');
            }
            out.extend_from_slice(&self.line_bytes(id));
        }
        out
    }

    /// Inserts `byte` at intra-line `offset` of `line`.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::OutOfMemory`](crate::EditorError::OutOfMemory)
    /// if the store or the span list cannot grow; the document is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is past the end of the line.
    pub fn insert_char(&mut self, line: LineId, offset: usize, byte: u8) -> Result<()> {
        let count = self.chain.line(line).char_count;
        assert!(offset <= count, "insert offset {offset} past line end {count}");

        let (index, delta) = span::locate(&self.chain.line(line).spans, offset);
        let committed = self.store.len();
        let at = self.store.append(byte)?;

        let target = self.chain.line_mut(line);
        if let Err(err) = span::insert_char(&mut target.spans, index, delta, at) {
            self.store.rollback_to(committed);
            return Err(err);
        }
        target.char_count += 1;

        if target.char_count > self.max_line_chars {
            self.max_line_chars = target.char_count;
        }
        Ok(())
    }

    /// Breaks `line` at `offset`. The characters from `offset` on move to a
    /// new line inserted right after it; its key is returned.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::OutOfMemory`](crate::EditorError::OutOfMemory)
    /// if the span lists cannot be allocated; the document is unchanged.
    pub fn split_line(&mut self, line: LineId, offset: usize) -> Result<LineId> {
        let count = self.chain.line(line).char_count;
        assert!(offset <= count, "split offset {offset} past line end {count}");

        let fresh_at = self.store.len();
        let target = self.chain.line_mut(line);
        let tail = span::split_off(&mut target.spans, offset, fresh_at)?;
        target.char_count = offset;

        let new_line = self.chain.insert_after(line, Line::from_spans(tail));

        if count == self.max_line_chars && offset < count {
            self.recompute_max_line_chars();
        }
        tracing::debug!(offset, lines = self.line_count(), "line split");
        Ok(new_line)
    }

    /// Deletes the character at `offset` of `line`.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::OutOfMemory`](crate::EditorError::OutOfMemory)
    /// if a span had to be split and the span list could not grow.
    ///
    /// # Panics
    ///
    /// Panics if there is no character at `offset`.
    pub fn delete_char(&mut self, line: LineId, offset: usize) -> Result<()> {
        let target = self.chain.line_mut(line);
        assert!(
            offset < target.char_count,
            "delete offset {offset} past line end {}",
            target.char_count
        );
        span::delete_char(&mut target.spans, offset)?;
        target.char_count -= 1;

        if target.char_count + 1 == self.max_line_chars {
            self.recompute_max_line_chars();
        }
        Ok(())
    }

    /// Removes the line break after `line`, merging it with the next line.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::OutOfMemory`](crate::EditorError::OutOfMemory)
    /// if the merged span list cannot grow; the document is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `line` is the last line.
    pub fn join_next(&mut self, line: LineId) -> Result<JoinOutcome> {
        let next = self
            .chain
            .next(line)
            .unwrap_or_else(|| panic!("no line break after the last line"));
        let count = self.chain.line(line).char_count;
        let next_count = self.chain.line(next).char_count;

        let outcome = if count == 0 {
            self.chain.remove(line);
            JoinOutcome::RemovedCurrent {
                removed: line,
                successor: next,
            }
        } else if next_count == 0 {
            self.chain.remove(next);
            JoinOutcome::RemovedNext {
                removed: next,
                into: line,
                offset: count,
            }
        } else {
            let incoming = self.chain.line(next).spans.len();
            self.chain
                .line_mut(line)
                .spans
                .try_reserve(incoming)
                .map_err(|_| crate::EditorError::oom(incoming))?;

            let removed = self.chain.remove(next);
            let target = self.chain.line_mut(line);
            target.spans.extend(removed.spans);
            target.char_count += removed.char_count;
            if target.char_count > self.max_line_chars {
                self.max_line_chars = target.char_count;
            }
            JoinOutcome::RemovedNext {
                removed: next,
                into: line,
                offset: count,
            }
        };

        tracing::debug!(?outcome, lines = self.line_count(), "lines joined");
        Ok(outcome)
    }

    fn recompute_max_line_chars(&mut self) {
        self.max_line_chars = self
            .chain
            .iter()
            .map(|(_, line)| line.char_count)
            .max()
            .unwrap_or(0);
    }

    /// Verifies the structural invariants of the piece table.
    ///
    /// # Panics
    ///
    /// Panics with a description of the first violated invariant.
    pub fn assert_invariants(&self) {
        let mut max = 0;
        let mut seen = 0;
        let mut prev = None;
        for (id, line) in self.chain.iter() {
            assert_eq!(line.prev(), prev, "broken back link at {id:?}");
            assert!(!line.spans.is_empty(), "line {id:?} has no spans");
            assert_eq!(
                line.char_count,
                span::total_len(&line.spans),
                "char count of {id:?} differs from its spans"
            );
            if line.char_count == 0 {
                assert_eq!(line.spans.len(), 1, "empty line {id:?} must hold one span");
            } else {
                assert!(
                    line.spans.iter().all(|s| !s.is_empty()),
                    "non-empty line {id:?} holds a zero-length span"
                );
            }
            for span in &line.spans {
                assert!(span.end() <= self.store.len(), "span {span:?} outside store");
            }
            max = max.max(line.char_count);
            seen += 1;
            prev = Some(id);
        }
        assert_eq!(seen, self.chain.len(), "chain walk missed lines");
        assert_eq!(prev, Some(self.chain.last()), "tail mismatch");
        assert_eq!(max, self.max_line_chars, "stale max line length");
    }
}
