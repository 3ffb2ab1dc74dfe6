//! Error type shared by the storage and viewport layers.

use thiserror::Error;

use crate::viewport::LayoutMode;

/// Errors reported by editing and scrolling operations.
///
/// Every operation that returns one of these leaves the document, the
/// viewport and the caret exactly as they were before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// Growing the text store or a span list failed, or the configured
    /// store limit would be exceeded.
    #[error("out of memory: could not reserve {requested} more entries")]
    OutOfMemory { requested: usize },
    /// The operation is not defined for the active layout mode.
    #[error("{operation} is not supported in {mode:?} mode")]
    InvalidMode {
        operation: &'static str,
        mode: LayoutMode,
    },
}

/// Convenience alias used across the core crate.
pub type Result<T> = std::result::Result<T, EditorError>;

impl EditorError {
    /// Builds an `OutOfMemory` error for a failed reservation of `requested` elements.
    pub(crate) fn oom(requested: usize) -> Self {
        tracing::warn!(requested, "allocation failed");
        EditorError::OutOfMemory { requested }
    }
}
