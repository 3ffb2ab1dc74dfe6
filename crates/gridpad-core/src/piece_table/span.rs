//! Spans: contiguous runs of characters of one line, stored by reference
//! into the [`TextStore`](crate::text_store::TextStore).

use crate::error::{EditorError, Result};

/// A contiguous run of characters referencing `len` bytes at `offset` in
/// the text store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
}

impl Span {
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// A zero-length span marking the insertion point of an empty line.
    pub fn empty(offset: usize) -> Self {
        Self { offset, len: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store offset one past the last byte of the span.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// The part of the span that starts `delta` characters in.
    pub fn suffix(&self, delta: usize) -> Span {
        debug_assert!(delta <= self.len);
        Span::new(self.offset + delta, self.len - delta)
    }
}

/// Finds the span holding intra-line `offset`.
///
/// Returns `(index, delta)` where `delta` is the number of characters of
/// that span that precede the offset. An offset that sits exactly on a
/// boundary resolves to the end of the earlier span (`delta == len`), so
/// offset 0 always resolves to `(0, 0)`.
pub(crate) fn locate(spans: &[Span], offset: usize) -> (usize, usize) {
    let mut delta = offset;
    let mut index = 0;
    while delta > spans[index].len {
        delta -= spans[index].len;
        index += 1;
        assert!(
            index < spans.len(),
            "offset {offset} lies past the end of the line"
        );
    }
    (index, delta)
}

/// Splits `spans[index]` so that its first `delta` characters stay in place
/// and the rest becomes a new span right after it.
///
/// The caller must have reserved room for one more element.
fn split_at(spans: &mut Vec<Span>, index: usize, delta: usize) {
    let tail = spans[index].suffix(delta);
    spans[index].len = delta;
    spans.insert(index + 1, tail);
}

fn reserve(spans: &mut Vec<Span>, additional: usize) -> Result<()> {
    spans
        .try_reserve(additional)
        .map_err(|_| EditorError::oom(additional))
}

/// Records the byte appended at store offset `at` as the character at
/// (`index`, `delta`).
///
/// Typing sequentially extends the preceding span instead of growing the
/// list, because every new byte lands right after the previous one in the
/// store.
pub(crate) fn insert_char(spans: &mut Vec<Span>, index: usize, delta: usize, at: usize) -> Result<()> {
    let span = spans[index];
    if span.is_empty() {
        spans[index] = Span::new(at, 1);
        return Ok(());
    }
    if delta == span.len && span.end() == at {
        spans[index].len += 1;
        return Ok(());
    }

    reserve(spans, 2)?;
    if delta > 0 && delta < span.len {
        split_at(spans, index, delta);
    }
    let position = if delta == 0 { index } else { index + 1 };
    spans.insert(position, Span::new(at, 1));
    Ok(())
}

/// Removes the character at intra-line `offset` by shrinking the span that
/// holds it from the front.
pub(crate) fn delete_char(spans: &mut Vec<Span>, offset: usize) -> Result<()> {
    let (index, delta) = locate(spans, offset);
    let target = if delta == 0 {
        index
    } else {
        if delta < spans[index].len {
            reserve(spans, 1)?;
            split_at(spans, index, delta);
        }
        index + 1
    };

    let span = &mut spans[target];
    span.offset += 1;
    span.len -= 1;
    if span.is_empty() && spans.len() > 1 {
        spans.remove(target);
    }
    Ok(())
}

/// Splits a span list at intra-line `offset`.
///
/// Returns the spans that belong to the new line; `spans` keeps the part
/// before the offset. Either side that ends up empty gets a single
/// zero-length span located at `fresh_at`. Nothing is modified on error.
pub(crate) fn split_off(spans: &mut Vec<Span>, offset: usize, fresh_at: usize) -> Result<Vec<Span>> {
    if offset == 0 {
        let mut head = Vec::new();
        reserve(&mut head, 1)?;
        head.push(Span::empty(fresh_at));
        return Ok(std::mem::replace(spans, head));
    }

    let (index, delta) = locate(spans, offset);
    let split_inside = delta < spans[index].len;
    let moved = spans.len() - (index + 1);

    let mut tail = Vec::new();
    reserve(&mut tail, (moved + usize::from(split_inside)).max(1))?;
    if split_inside {
        tail.push(spans[index].suffix(delta));
    }
    tail.extend_from_slice(&spans[index + 1..]);
    if tail.is_empty() {
        tail.push(Span::empty(fresh_at));
    }

    spans.truncate(index + 1);
    spans[index].len = delta;
    Ok(tail)
}

/// Total number of characters referenced by `spans`.
pub fn total_len(spans: &[Span]) -> usize {
    spans.iter().map(|s| s.len).sum()
}
