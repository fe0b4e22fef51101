//! Editing model: caret and selection

mod caret;

pub use caret::{Caret, CaretGeometry, RowCol, Selection, SelectionSpan};
