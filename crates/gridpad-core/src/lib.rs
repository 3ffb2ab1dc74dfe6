pub mod caret;
pub mod editor;
pub mod error;
pub mod piece_table;
pub mod surface;
pub mod text_store;
pub mod viewport;
pub mod wrap;

pub use caret::{Caret, HiddenFlags, TextPos};
pub use editor::{Editor, EditorOptions, Motion};
pub use error::{EditorError, Result};
pub use piece_table::{Document, JoinOutcome, Line, LineChain, LineId, Span};
pub use surface::{Axis, CaretWidget, GlyphMetrics, GridSurface, RenderSurface, ScrollbarWidget};
pub use text_store::TextStore;
pub use viewport::{Anchor, Direction, GridSize, LayoutMode, ScrollAxis, Viewport};
pub use wrap::WrapModel;
