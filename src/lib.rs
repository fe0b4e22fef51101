//! Typeline: a row-based rich-text composition core
//!
//! This crate provides the composition engine behind a small rich-text
//! editor:
//! - A document tree of measured character glyphs grouped into rows
//! - A full layout pass with per-row centering and column-based wrapping
//! - A caret/selection model addressed in (row, column) coordinates
//! - Geometric hit-testing between pointer positions and caret positions
//! - Display-list frames for embedders to paint
//!
//! All mutation is synchronous and single-threaded; the engine owns the
//! document, caret, and selection exclusively, and embedders drive it
//! through commands and read back frames.

pub mod document;
pub mod editing;
pub mod error;
pub mod layout;
pub mod render;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmComposer;

// Re-export primary types
pub use document::{CharGlyph, Document, Row, TextStyle};
pub use editing::{Caret, CaretGeometry, RowCol, Selection, SelectionSpan};
pub use error::NotLaidOut;
pub use layout::{Composition, FontMetrics, LayoutConstraints, Measure};
pub use render::{DisplayItem, DisplayList};

/// Editor coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Measured extent
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Editor rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}
