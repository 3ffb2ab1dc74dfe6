//! Lines and the doubly-linked chain that orders them.
//!
//! Lines live in a [`SlotMap`] arena. Neighbour links and every external
//! reference (viewport anchor, caret) are [`LineId`] keys, so removing a
//! line invalidates its key instead of leaving a dangling pointer; a stale
//! key is caught on the next lookup.

use slotmap::{new_key_type, SlotMap};

use super::span::{self, Span};

new_key_type! {
    /// Stable handle to a line of a document.
    pub struct LineId;
}

/// One paragraph of the document: an ordered list of spans.
#[derive(Debug, Clone)]
pub struct Line {
    pub(crate) spans: Vec<Span>,
    pub(crate) char_count: usize,
    prev: Option<LineId>,
    next: Option<LineId>,
}

impl Line {
    /// Builds an unlinked line from its spans.
    pub(crate) fn from_spans(spans: Vec<Span>) -> Self {
        debug_assert!(!spans.is_empty(), "a line always owns at least one span");
        let char_count = span::total_len(&spans);
        Self {
            spans,
            char_count,
            prev: None,
            next: None,
        }
    }

    /// Number of characters on the line, excluding the line break.
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    pub fn is_empty(&self) -> bool {
        self.char_count == 0
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn prev(&self) -> Option<LineId> {
        self.prev
    }

    pub fn next(&self) -> Option<LineId> {
        self.next
    }
}

/// The ordered sequence of lines of a document. Never empty.
#[derive(Debug, Clone)]
pub struct LineChain {
    lines: SlotMap<LineId, Line>,
    head: LineId,
    tail: LineId,
}

impl LineChain {
    /// Creates a chain holding a single line.
    pub(crate) fn new(first: Line) -> Self {
        let mut lines = SlotMap::with_key();
        let id = lines.insert(first);
        Self {
            lines,
            head: id,
            tail: id,
        }
    }

    /// Number of lines in the chain.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn first(&self) -> LineId {
        self.head
    }

    pub fn last(&self) -> LineId {
        self.tail
    }

    /// Returns true while `id` refers to a live line.
    pub fn contains(&self, id: LineId) -> bool {
        self.lines.contains_key(id)
    }

    pub fn get(&self, id: LineId) -> Option<&Line> {
        self.lines.get(id)
    }

    /// Returns the line for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` refers to a line that has been removed. External
    /// references must be repaired by whatever removed the line.
    pub fn line(&self, id: LineId) -> &Line {
        self.lines
            .get(id)
            .unwrap_or_else(|| panic!("stale line reference {id:?}"))
    }

    pub(crate) fn line_mut(&mut self, id: LineId) -> &mut Line {
        self.lines
            .get_mut(id)
            .unwrap_or_else(|| panic!("stale line reference {id:?}"))
    }

    pub fn next(&self, id: LineId) -> Option<LineId> {
        self.line(id).next
    }

    pub fn prev(&self, id: LineId) -> Option<LineId> {
        self.line(id).prev
    }

    /// Walks `count` lines forward from `id`, stopping at the last line.
    /// Returns the reached line and the number of steps taken.
    pub fn walk_forward(&self, id: LineId, count: usize) -> (LineId, usize) {
        let mut current = id;
        let mut steps = 0;
        while steps < count {
            match self.next(current) {
                Some(next) => current = next,
                None => break,
            }
            steps += 1;
        }
        (current, steps)
    }

    /// Walks `count` lines backward from `id`, stopping at the first line.
    /// Returns the reached line and the number of steps taken.
    pub fn walk_back(&self, id: LineId, count: usize) -> (LineId, usize) {
        let mut current = id;
        let mut steps = 0;
        while steps < count {
            match self.prev(current) {
                Some(prev) => current = prev,
                None => break,
            }
            steps += 1;
        }
        (current, steps)
    }

    /// Returns the line at zero-based position `index`, scanning from the head.
    pub fn nth(&self, index: usize) -> Option<LineId> {
        self.iter().nth(index).map(|(id, _)| id)
    }

    /// Zero-based position of `id`, scanning from the head.
    pub fn index_of(&self, id: LineId) -> Option<usize> {
        self.iter().position(|(candidate, _)| candidate == id)
    }

    /// Iterates lines in document order.
    pub fn iter(&self) -> Lines<'_> {
        Lines {
            chain: self,
            cursor: Some(self.head),
        }
    }

    /// Links `line` right after `after` and returns its key.
    pub(crate) fn insert_after(&mut self, after: LineId, mut line: Line) -> LineId {
        let next = self.line(after).next;
        line.prev = Some(after);
        line.next = next;
        let id = self.lines.insert(line);

        self.line_mut(after).next = Some(id);
        match next {
            Some(next) => self.line_mut(next).prev = Some(id),
            None => self.tail = id,
        }
        id
    }

    /// Unlinks and returns the line `id`.
    ///
    /// # Panics
    ///
    /// Panics when asked to remove the only line of the chain.
    pub(crate) fn remove(&mut self, id: LineId) -> Line {
        assert!(self.lines.len() > 1, "cannot remove the last remaining line");
        let line = self
            .lines
            .remove(id)
            .unwrap_or_else(|| panic!("stale line reference {id:?}"));

        match line.prev {
            Some(prev) => self.line_mut(prev).next = line.next,
            None => self.head = line.next.expect("non-head line has a predecessor"),
        }
        match line.next {
            Some(next) => self.line_mut(next).prev = line.prev,
            None => self.tail = line.prev.expect("non-tail line has a successor"),
        }
        line
    }
}

/// Iterator over `(LineId, &Line)` in document order.
#[derive(Debug)]
pub struct Lines<'a> {
    chain: &'a LineChain,
    cursor: Option<LineId>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = (LineId, &'a Line);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let line = self.chain.line(id);
        self.cursor = line.next;
        Some((id, line))
    }
}
