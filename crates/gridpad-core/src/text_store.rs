//! Append-only byte store backing every span of a document.
use std::fmt;

use crate::error::{EditorError, Result};

/// Append-only buffer that owns all character data of a document.
///
/// Characters are never mutated or removed in place. Deleting text only
/// changes which spans reference the store; the bytes stay behind until the
/// whole document is reloaded.
#[derive(Clone, Default)]
pub struct TextStore {
    data: Vec<u8>,
    /// Optional hard cap on `data.len()`. Growing past it is reported the
    /// same way as a failed allocation.
    limit: Option<usize>,
}

impl fmt::Debug for TextStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextStore")
            .field("len", &self.data.len())
            .field("capacity", &self.data.capacity())
            .field("limit", &self.limit)
            .finish()
    }
}

impl TextStore {
    /// Creates an empty, unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that refuses to grow beyond `limit` bytes.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            data: Vec::new(),
            limit: Some(limit),
        }
    }

    /// Number of bytes ever appended (live or not).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Allocated capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Configured byte limit, if any.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Appends one byte and returns its offset.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::OutOfMemory`] if the store cannot grow. The
    /// store is left untouched in that case.
    pub fn append(&mut self, byte: u8) -> Result<usize> {
        self.reserve(1)?;
        let offset = self.data.len();
        self.data.push(byte);
        Ok(offset)
    }

    /// Appends a run of bytes and returns the offset of the first one.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::OutOfMemory`] if the store cannot grow. Either
    /// all bytes are appended or none.
    pub fn extend(&mut self, bytes: &[u8]) -> Result<usize> {
        self.reserve(bytes.len())?;
        let offset = self.data.len();
        self.data.extend_from_slice(bytes);
        Ok(offset)
    }

    /// Returns `len` bytes starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the range lies outside the store. Spans are created only
    /// from offsets handed out by this store, so a bad range is a bookkeeping
    /// bug in the piece table.
    pub fn slice(&self, offset: usize, len: usize) -> &[u8] {
        let end = offset
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .unwrap_or_else(|| {
                panic!(
                    "span [{offset}, +{len}) outside text store of {} bytes",
                    self.data.len()
                )
            });
        &self.data[offset..end]
    }

    /// Drops everything appended after `len`.
    ///
    /// Only used to undo an append whose edit could not be completed.
    pub(crate) fn rollback_to(&mut self, len: usize) {
        debug_assert!(len <= self.data.len());
        self.data.truncate(len);
    }

    fn reserve(&mut self, additional: usize) -> Result<()> {
        if let Some(limit) = self.limit {
            if self.data.len().saturating_add(additional) > limit {
                return Err(EditorError::oom(additional));
            }
        }
        self.data
            .try_reserve(additional)
            .map_err(|_| EditorError::oom(additional))
    }
}
